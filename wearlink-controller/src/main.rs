//! Controller CLI for wearlink devices
//!
//! Lists paired peripherals and pushes UTF-8 text to the text-input
//! characteristic over BLE.

use clap::{Parser, Subcommand};
use wearlink_ble::platform::BtleTransport;
use wearlink_ble::{CharacteristicId, Session};

#[derive(Parser)]
#[command(name = "wearlink")]
#[command(about = "Send text to wearlink devices over BLE")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List previously-paired peripherals
    List,
    /// Connect to a peripheral and send UTF-8 text
    Send {
        /// Device address, e.g. AA:BB:CC:DD:EE:FF
        #[arg(short, long)]
        device: String,
        /// Text to deliver to the text-input characteristic
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let transport = BtleTransport::new().await?;
    // The event mirror is for UI layers; headless commands report through
    // the Result values.
    let (mut session, _events) = Session::new(transport);

    match cli.command {
        Commands::List => {
            let peripherals = session.paired_peripherals().await;
            println!("{} paired peripherals:", peripherals.len());
            for peripheral in peripherals {
                println!("  {} ({})", peripheral.display_name(), peripheral.address);
            }
        }
        Commands::Send { device, text } => {
            println!("Connecting to {device}...");
            let name = session.connect(&device).await?;
            println!("Connected to {name}");

            session
                .write(text.as_bytes(), CharacteristicId::TextInput)
                .await?;
            println!("write succeeded ({} bytes)", text.len());

            session.disconnect().await;
        }
    }

    Ok(())
}
