//! Estado de subasta
//!
//! Máquina de tres estados derivada del reloj: nunca se persiste, se
//! recalcula en cada consulta a partir de `openAt`, `closeAt` y `now`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::models::passport::AuctionInfo;
use crate::utils::format::{format_zar, MISSING};
use crate::utils::validation::validate_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionPhase {
    Upcoming,
    Live,
    Closed,
}

impl AuctionPhase {
    pub fn call_to_action(&self) -> &'static str {
        match self {
            AuctionPhase::Upcoming => "Set reminder",
            AuctionPhase::Live => "Bid now",
            AuctionPhase::Closed => "Lot closed",
        }
    }
}

/// Ventana de la subasta. Un `open_at` ausente cuenta como ya abierto y un
/// `close_at` ausente como ya cerrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuctionWindow {
    pub open_at: Option<DateTime<Utc>>,
    pub close_at: Option<DateTime<Utc>>,
}

impl AuctionWindow {
    pub fn new(open_at: Option<DateTime<Utc>>, close_at: Option<DateTime<Utc>>) -> Self {
        Self { open_at, close_at }
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> AuctionPhase {
        let opened = self.open_at.map_or(true, |open| now >= open);
        let before_close = self.close_at.map_or(false, |close| now < close);
        if !opened {
            AuctionPhase::Upcoming
        } else if before_close {
            AuctionPhase::Live
        } else {
            AuctionPhase::Closed
        }
    }

    /// Instante hacia el que corre la cuenta regresiva
    pub fn target(&self, phase: AuctionPhase) -> Option<DateTime<Utc>> {
        match phase {
            AuctionPhase::Upcoming => self.open_at,
            AuctionPhase::Live => self.close_at,
            AuctionPhase::Closed => None,
        }
    }

    pub fn countdown_at(&self, now: DateTime<Utc>) -> Option<Countdown> {
        let phase = self.phase_at(now);
        self.target(phase).map(|target| Countdown::until(target, now, phase))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub remaining_seconds: i64,
    /// HH:MM:SS
    pub display: String,
    /// "Opens in" / "Closes in"
    pub label: &'static str,
}

impl Countdown {
    fn until(target: DateTime<Utc>, now: DateTime<Utc>, phase: AuctionPhase) -> Self {
        let remaining_seconds = (target - now).num_seconds().max(0);
        let label = match phase {
            AuctionPhase::Upcoming => "Opens in",
            _ => "Closes in",
        };
        Self {
            remaining_seconds,
            display: format_hms(remaining_seconds),
            label,
        }
    }
}

/// Segundos → "HH:MM:SS". Las horas no se recortan a dos dígitos.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionView {
    pub phase: AuctionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
    pub call_to_action: &'static str,
    /// Solo mientras la subasta está en vivo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_url: Option<String>,
    pub current_bid: String,
    pub bids: u32,
    pub reserve: &'static str,
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match validate_datetime(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("⚠️ Timestamp de subasta inválido en {}: '{}'", field, value);
            None
        }
    }
}

impl AuctionWindow {
    /// Ventana desde los datos del pasaporte; timestamps ilegibles cuentan como ausentes
    pub fn from_info(info: &AuctionInfo) -> Self {
        Self::new(
            parse_timestamp("openAt", info.open_at.as_deref()),
            parse_timestamp("closeAt", info.close_at.as_deref()),
        )
    }
}

/// Vista de la subasta. Sin datos de subasta el lote se muestra como
/// próximo y sin cuenta regresiva.
pub fn derive_view(window: Option<AuctionWindow>, info: Option<&AuctionInfo>, now: DateTime<Utc>) -> AuctionView {
    let (phase, countdown) = match window {
        Some(window) => (window.phase_at(now), window.countdown_at(now)),
        None => (AuctionPhase::Upcoming, None),
    };

    let bid_url = match phase {
        AuctionPhase::Live => Some(
            info.and_then(|i| i.url.clone())
                .unwrap_or_else(|| "#".to_string()),
        ),
        _ => None,
    };

    AuctionView {
        phase,
        countdown,
        call_to_action: phase.call_to_action(),
        bid_url,
        current_bid: info
            .and_then(|i| i.current_bid)
            .map(format_zar)
            .unwrap_or_else(|| MISSING.to_string()),
        bids: info.and_then(|i| i.bids).unwrap_or(0),
        reserve: if info.and_then(|i| i.reserve_met).unwrap_or(false) {
            "Reserve met"
        } else {
            "Reserve not met"
        },
    }
}

/// Atajo para los datos tal como vienen en el pasaporte
pub fn view_for(info: Option<&AuctionInfo>, now: DateTime<Utc>) -> AuctionView {
    derive_view(info.map(AuctionWindow::from_info), info, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, min, sec).unwrap()
    }

    fn window() -> AuctionWindow {
        AuctionWindow::new(Some(at(10, 0, 0)), Some(at(12, 0, 0)))
    }

    #[test]
    fn test_phases() {
        assert_eq!(window().phase_at(at(9, 59, 59)), AuctionPhase::Upcoming);
        assert_eq!(window().phase_at(at(10, 0, 0)), AuctionPhase::Live);
        assert_eq!(window().phase_at(at(11, 0, 0)), AuctionPhase::Live);
        assert_eq!(window().phase_at(at(12, 0, 0)), AuctionPhase::Closed);
        assert_eq!(window().phase_at(at(18, 0, 0)), AuctionPhase::Closed);
    }

    #[test]
    fn test_missing_boundaries() {
        let no_open = AuctionWindow::new(None, Some(at(12, 0, 0)));
        assert_eq!(no_open.phase_at(at(11, 0, 0)), AuctionPhase::Live);

        let no_close = AuctionWindow::new(Some(at(10, 0, 0)), None);
        assert_eq!(no_close.phase_at(at(9, 0, 0)), AuctionPhase::Upcoming);
        assert_eq!(no_close.phase_at(at(10, 30, 0)), AuctionPhase::Closed);

        assert_eq!(AuctionWindow::default().phase_at(at(10, 0, 0)), AuctionPhase::Closed);
    }

    #[test]
    fn test_countdown_targets() {
        let upcoming = window().countdown_at(at(8, 58, 30)).unwrap();
        assert_eq!(upcoming.display, "01:01:30");
        assert_eq!(upcoming.label, "Opens in");

        let live = window().countdown_at(at(11, 59, 59)).unwrap();
        assert_eq!(live.remaining_seconds, 1);
        assert_eq!(live.label, "Closes in");

        assert!(window().countdown_at(at(12, 0, 0)).is_none());
    }

    #[test]
    fn test_countdown_truncates_sub_second() {
        let now = at(11, 0, 0) + Duration::milliseconds(400);
        let countdown = window().countdown_at(now).unwrap();
        assert_eq!(countdown.remaining_seconds, 3599);
        assert_eq!(countdown.display, "00:59:59");
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(-5), "00:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let now = at(11, 15, 0);
        assert_eq!(window().countdown_at(now), window().countdown_at(now));
    }

    #[test]
    fn test_view_without_auction() {
        let view = view_for(None, at(10, 0, 0));
        assert_eq!(view.phase, AuctionPhase::Upcoming);
        assert!(view.countdown.is_none());
        assert_eq!(view.call_to_action, "Set reminder");
        assert_eq!(view.current_bid, MISSING);
        assert_eq!(view.reserve, "Reserve not met");
    }

    #[test]
    fn test_view_live_auction() {
        let info = AuctionInfo {
            open_at: Some("2025-03-01T10:00:00Z".to_string()),
            close_at: Some("2025-03-01T12:00:00Z".to_string()),
            reserve_met: Some(true),
            current_bid: Some(185000.0),
            bids: Some(12),
            url: Some("https://auction.example/lot/1".to_string()),
        };
        let view = view_for(Some(&info), at(11, 0, 0));
        assert_eq!(view.phase, AuctionPhase::Live);
        assert_eq!(view.call_to_action, "Bid now");
        assert_eq!(view.bid_url.as_deref(), Some("https://auction.example/lot/1"));
        assert_eq!(view.current_bid, "R\u{a0}185\u{a0}000");
        assert_eq!(view.bids, 12);
        assert_eq!(view.reserve, "Reserve met");
        assert_eq!(view.countdown.unwrap().display, "01:00:00");
    }

    #[test]
    fn test_view_unparsable_timestamps() {
        let info = AuctionInfo {
            open_at: Some("tomorrow".to_string()),
            close_at: Some("2025-03-01T12:00:00Z".to_string()),
            ..Default::default()
        };
        let view = view_for(Some(&info), at(11, 0, 0));
        assert_eq!(view.phase, AuctionPhase::Live);
    }
}
