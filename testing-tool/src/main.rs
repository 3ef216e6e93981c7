use anyhow::{anyhow, Result};
use colored::*;
use serde_json::Value;
use std::io::{self, Write};

/// Caso de la demo: VIN, descripción y resultado esperado
struct DemoVin {
    vin: &'static str,
    description: &'static str,
    expected: Expected,
}

enum Expected {
    Electric { make: &'static str, battery_kwh: f64, smartcar: bool },
    NotElectric,
    Error(&'static str),
}

const DEMO_VINS: &[DemoVin] = &[
    DemoVin {
        vin: "WDD2040082R088866",
        description: "Mercedes-Benz EQS (production VIN)",
        expected: Expected::Electric { make: "Mercedes-Benz", battery_kwh: 80.0, smartcar: true },
    },
    DemoVin {
        vin: "WBA1A2B3C4D5E6789",
        description: "BMW iX (test VIN)",
        expected: Expected::Electric { make: "BMW", battery_kwh: 85.0, smartcar: true },
    },
    DemoVin {
        vin: "JYJ1A2B3C4D5E6789",
        description: "Tesla Model 3 (test VIN)",
        expected: Expected::Electric { make: "Tesla", battery_kwh: 75.0, smartcar: true },
    },
    DemoVin {
        vin: "WVW1A2B3C4D5E6789",
        description: "VW ID.4 (test VIN)",
        expected: Expected::Electric { make: "Volkswagen", battery_kwh: 77.0, smartcar: true },
    },
    DemoVin {
        vin: "LGX1A2B3C4D5E6789",
        description: "BYD Atto 3 (test VIN)",
        expected: Expected::Electric { make: "BYD", battery_kwh: 60.0, smartcar: false },
    },
    DemoVin {
        vin: "MAJFXXMTKFJP14265",
        description: "Mazda ICE (production VIN)",
        expected: Expected::NotElectric,
    },
    DemoVin {
        vin: "MAJ1A2B3C4D5E6789",
        description: "Mazda ICE (test VIN)",
        expected: Expected::NotElectric,
    },
    DemoVin {
        vin: "WDD123456789012",
        description: "Too short",
        expected: Expected::Error("invalid_vin_length"),
    },
    DemoVin {
        vin: "WDD1234567890123456",
        description: "Too long",
        expected: Expected::Error("invalid_vin_length"),
    },
    DemoVin {
        vin: "WDD12345I789O123Q",
        description: "Invalid characters (I, O, Q)",
        expected: Expected::Error("invalid_vin_characters"),
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚗 Vehicle Passport Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = std::env::var("VEHICLE_PASSPORT_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let base_url = base_url.trim_end_matches('/').to_string();
    println!("{} {}", "🌐 Servicio:".bright_cyan(), base_url);

    let client = reqwest::Client::new();

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🔍 Consultar un VIN (detección EV + verificación)");
        println!("2. 🧪 Ejecutar la demo de VINs");
        println!("3. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-3): ")?;

        let result = match choice.as_str() {
            "1" => {
                let vin = prompt("VIN: ")?;
                check_vin(&client, &base_url, &vin).await
            }
            "2" => run_demo(&client, &base_url).await,
            "3" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌ Error:".bright_red().bold(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<(u16, Value)> {
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body = serde_json::from_str(&text)
        .map_err(|e| anyhow!("Respuesta no JSON ({}): {}", e, text))?;
    Ok((status, body))
}

async fn detect_ev(client: &reqwest::Client, base_url: &str, vin: &str) -> Result<Value> {
    let url = format!("{}/api/ev-detection?vin={}", base_url, urlencoding::encode(vin));
    let (_, body) = get_json(client, &url).await?;
    Ok(body)
}

fn print_detection(body: &Value) {
    let electric = body["isElectric"].as_bool().unwrap_or(false);
    println!(
        "     Electric: {}",
        if electric { "✅ Yes".green() } else { "❌ No".red() }
    );
    if electric {
        println!("     Make: {}", body["make"].as_str().unwrap_or("-"));
        println!("     Battery: {} kWh", body["batteryEstimateKwh"]);
        println!(
            "     Smartcar: {}",
            if body["smartcarCompatible"].as_bool().unwrap_or(false) { "✅ Yes" } else { "❌ No" }
        );
        println!(
            "     Confidence: {}%",
            (body["confidence"].as_f64().unwrap_or(0.0) * 100.0).round()
        );
        if let Some(caveat) = body["caveat"].as_str() {
            println!("     Notes: {}", caveat.yellow());
        }
    } else if let Some(error) = body["error"].as_str() {
        println!("     Error: {}", error.bright_red());
    }
}

async fn check_vin(client: &reqwest::Client, base_url: &str, vin: &str) -> Result<()> {
    println!();
    println!("{}", "🔋 DETECCIÓN EV".bright_cyan().bold());
    let detection = detect_ev(client, base_url, vin).await?;
    print_detection(&detection);

    println!();
    println!("{}", "🔐 VERIFICACIÓN DEL PASAPORTE".bright_cyan().bold());
    let url = format!("{}/api/passports/{}/verify", base_url, urlencoding::encode(vin));
    let (status, body) = get_json(client, &url).await?;

    if status >= 400 {
        println!(
            "     {} {}",
            format!("HTTP {}:", status).bright_red(),
            body["message"].as_str().unwrap_or("error")
        );
        return Ok(());
    }

    let title = body["title"].as_str().unwrap_or("-");
    let subtitle = body["subtitle"].as_str().unwrap_or("");
    let line = match body["status"].as_str() {
        Some("verified") => title.green().bold(),
        Some("failed") => title.red().bold(),
        _ => title.yellow().bold(),
    };
    println!("     {}", line);
    println!("     {}", subtitle);
    if let Some(key_id) = body["key_id"].as_str() {
        println!("     Key: {}", key_id);
    }
    Ok(())
}

fn matches_expected(expected: &Expected, body: &Value) -> bool {
    match expected {
        Expected::Electric { make, battery_kwh, smartcar } => {
            body["make"].as_str() == Some(*make)
                && body["batteryEstimateKwh"].as_f64() == Some(*battery_kwh)
                && body["smartcarCompatible"].as_bool() == Some(*smartcar)
                && body["confidence"].as_f64() == Some(0.7)
        }
        Expected::NotElectric => {
            body["isElectric"].as_bool() == Some(false) && body["confidence"].as_f64() == Some(0.0)
        }
        Expected::Error(code) => body["error"].as_str() == Some(*code),
    }
}

async fn run_demo(client: &reqwest::Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🧪 EV VIN Detection Demo".bright_cyan().bold());
    println!("{}", "=".repeat(40).bright_cyan());

    let mut passed = 0;
    for case in DEMO_VINS {
        let body = detect_ev(client, base_url, case.vin).await?;
        println!();
        println!("📋 {}", case.description.bold());
        println!("   VIN: {}", case.vin);
        print_detection(&body);

        if matches_expected(&case.expected, &body) {
            passed += 1;
            println!("     Status: {}", "✅ PASS".green());
        } else {
            println!("     Status: {}", "❌ FAIL".red());
        }
    }

    println!();
    println!("{}", "📊 RESUMEN".bright_green().bold());
    println!("   {}/{} casos correctos", passed, DEMO_VINS.len());
    Ok(())
}
