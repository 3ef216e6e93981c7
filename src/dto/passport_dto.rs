use serde::Deserialize;

use crate::services::passport_view::Audience;

// Query del resumen: `?audience=customer|internal`
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub audience: Option<Audience>,
}
