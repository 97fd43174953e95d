//! TFT Panel Control Tool
//!
//! Drives an ILI9341/ILI948x panel over a simulated wire and captures the
//! resulting controller memory as a PNG.

mod config;
mod demo;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use demo::{Demo, Wheel};
use session::{describe_frame, Session};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tft_panel_hw::color::parse_hex_color;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tftpanelctl")]
#[command(about = "Control tool for ILI9341/ILI948x TFT panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Screenshot path (overrides the configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rotation in degrees (overrides the configuration)
    #[arg(short, long)]
    rotation: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Draw(DrawCommands),
    /// Show panel information
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the command frames sent during power-on
    Frames,
}

/// Commands that change panel memory and end with a screenshot.
#[derive(Subcommand)]
enum DrawCommands {
    /// Fill the whole screen with a color
    Fill {
        /// Color in hex format (e.g., #FF0000 for red)
        color: String,
    },
    /// Fill a rectangle
    Rect {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        /// Color in hex format
        color: String,
    },
    /// Draw a horizontal or vertical line between two points
    Line {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        /// Color in hex format
        color: String,
    },
    /// Stream an uncompressed bitmap file into a rectangle
    Bitmap {
        /// Bitmap file path
        path: PathBuf,

        #[arg(long, default_value = "0")]
        x: u16,

        #[arg(long, default_value = "0")]
        y: u16,

        /// Target width (default: logical screen width)
        #[arg(long)]
        width: Option<u16>,

        /// Target height (default: logical screen height)
        #[arg(long)]
        height: Option<u16>,

        /// Bits per pixel of the source
        #[arg(long, default_value = "24")]
        bpp: u8,
    },
    /// Draw a demo pattern
    Demo {
        #[arg(value_enum)]
        pattern: Demo,

        /// Color wheel for the palette demo
        #[arg(long, default_value = "cmy", value_enum)]
        wheel: Wheel,

        /// Redraw once per rotation step, clockwise from native
        #[arg(long)]
        sweep: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(rotation) = cli.rotation {
        config.orientation.rotation = rotation;
    }
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output));

    let mut session = Session::open(&config)?;

    match cli.command {
        Commands::Draw(command) => {
            handle_draw(command, &mut session)?;
            session.save_screenshot(&output)?;
            println!("Screenshot saved to: {}", output.display());
            Ok(())
        }
        Commands::Info { json } => handle_info(&session, json),
        Commands::Frames => handle_frames(&session),
    }
}

fn handle_draw(command: DrawCommands, session: &mut Session) -> Result<()> {
    let panel = &mut session.panel;
    match command {
        DrawCommands::Fill { color } => {
            panel.fill_screen(parse_color(&color)?)?;
            println!("Screen filled with: {}", color);
        }
        DrawCommands::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            panel.fill_rectangle(x, y, width, height, parse_color(&color)?)?;
            println!("Filled {}x{} at ({}, {}) with: {}", width, height, x, y, color);
        }
        DrawCommands::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        } => {
            let color_value = parse_color(&color)?;
            if y0 == y1 {
                panel.draw_hline(x0, x1, y0, color_value)?;
            } else if x0 == x1 {
                panel.draw_vline(x0, y0, y1, color_value)?;
            } else {
                anyhow::bail!("Only horizontal and vertical lines are supported");
            }
            println!("Line ({}, {}) - ({}, {}) drawn with: {}", x0, y0, x1, y1, color);
        }
        DrawCommands::Bitmap {
            path,
            x,
            y,
            width,
            height,
            bpp,
        } => {
            let (screen_width, screen_height) = panel.size();
            let width = width.unwrap_or(screen_width.saturating_sub(x));
            let height = height.unwrap_or(screen_height.saturating_sub(y));
            let file = File::open(&path)
                .with_context(|| format!("Failed to open bitmap {}", path.display()))?;

            let forwarded = panel.stream_bitmap(BufReader::new(file), x, y, width, height, bpp)?;
            println!("Streamed {} bytes from {}", forwarded, path.display());
        }
        DrawCommands::Demo {
            pattern,
            wheel,
            sweep,
        } => {
            match sweep {
                Some(steps) => demo::rotation_sweep(panel, pattern, wheel, steps)?,
                None => pattern.draw(panel, wheel)?,
            }
            info!("Demo {:?} done", pattern);
            println!("Demo drawn: {:?}", pattern);
        }
    }
    Ok(())
}

fn handle_info(session: &Session, json: bool) -> Result<()> {
    let info = session.info();
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Panel Status:");
    println!("  Controller: {}", info.controller);
    println!("  Native size: {}x{}", info.native_width, info.native_height);
    println!("  Logical size: {}x{}", info.width, info.height);
    println!("  Rotation: {}°", info.rotation);
    println!("  Mirror: {}", if info.mirror { "yes" } else { "no" });
    println!("  Color order: {}", info.color_order);
    println!("  Memory access control: {}", info.control_byte);
    println!("  Transport buffer: {} bytes", info.buffer_capacity);
    println!("  Init commands: {}", info.init_commands);
    println!("  Backlight: {}", if info.backlight { "wired" } else { "none" });
    println!("  Frames sent: {}", info.frames);
    Ok(())
}

fn handle_frames(session: &Session) -> Result<()> {
    for (i, frame) in session.frames().iter().enumerate() {
        println!("{:4}  {}", i, describe_frame(frame));
    }
    Ok(())
}

fn parse_color(color: &str) -> Result<u32> {
    parse_hex_color(color)
        .with_context(|| format!("Invalid color: {}. Use #RRGGBB", color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tftpanelctl", "-r", "90", "rect", "1", "2", "3", "4", "#00FF00"])
            .unwrap();
        assert_eq!(cli.rotation, Some(90));
        assert!(matches!(
            cli.command,
            Commands::Draw(DrawCommands::Rect {
                x: 1,
                y: 2,
                width: 3,
                height: 4,
                ..
            })
        ));

        let cli = Cli::try_parse_from(["tftpanelctl", "demo", "quadrant", "--sweep", "4"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Draw(DrawCommands::Demo {
                pattern: Demo::Quadrant,
                sweep: Some(4),
                ..
            })
        ));

        let cli = Cli::try_parse_from(["tftpanelctl", "info", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Info { json: true }));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FE2712").unwrap(), 0xFE2712);
        assert!(parse_color("red").is_err());
    }

    #[test]
    fn test_bitmap_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.bmp");
        let mut bytes = vec![0u8; 54];
        bytes[..2].copy_from_slice(b"BM");
        bytes[10..14].copy_from_slice(&54u32.to_le_bytes());
        bytes.extend([0x00, 0x00, 0xFF].repeat(4));
        std::fs::write(&path, bytes).unwrap();

        let mut session = Session::open(&Config::default()).unwrap();
        handle_draw(
            DrawCommands::Bitmap {
                path,
                x: 0,
                y: 0,
                width: Some(2),
                height: Some(2),
                bpp: 24,
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(session.framebuffer().get_pixel(1, 1), Some(0xFF0000));
    }

    #[test]
    fn test_diagonal_line_rejected() {
        let mut session = Session::open(&Config::default()).unwrap();
        let result = handle_draw(
            DrawCommands::Line {
                x0: 0,
                y0: 0,
                x1: 5,
                y1: 5,
                color: "#FFFFFF".to_string(),
            },
            &mut session,
        );
        assert!(result.is_err());
    }
}
