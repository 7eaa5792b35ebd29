//! drmmode-probe - exercise armsoc backends on real hardware
//!
//! Commands:
//! - `drmmode-probe info` - Show the kernel driver and selected backend
//! - `drmmode-probe cursor --plane <id>` - Run the cursor plane setup
//! - `drmmode-probe dumb --bpp 32 --width 1920 --height 1080` - Allocate a buffer
//!
//! The device defaults to `$DRMMODE_DEVICE`, then `/dev/dri/card0`.

use anyhow::{Context, Result};
use armsoc_drmmode::{
    find_interface, interface_for_device, BufferType, CreateGem, CursorApi, DrmModeInterface,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use drm_platform::{Card, DrmDevice, DEFAULT_CARD};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "drmmode-probe")]
#[command(version)]
#[command(about = "Exercise armsoc mode-setting backends against a DRM node", long_about = None)]
struct Cli {
    /// DRM node to open
    #[arg(short, long, env = "DRMMODE_DEVICE", default_value = DEFAULT_CARD)]
    device: PathBuf,

    /// Select the backend by this driver name instead of the kernel's
    #[arg(long)]
    driver_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show kernel driver version and backend capabilities
    Info,

    /// Raise a plane's zpos as done for the hardware cursor
    Cursor {
        /// Plane object id
        #[arg(long)]
        plane: u32,
    },

    /// Allocate a buffer through the backend
    Dumb {
        /// Bits per pixel
        #[arg(long, default_value_t = 32)]
        bpp: u32,

        /// Width in pixels
        #[arg(long)]
        width: u32,

        /// Height in pixels
        #[arg(long)]
        height: u32,

        /// Request an off-screen buffer
        #[arg(long)]
        non_scanout: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let card = Card::open(&cli.device)
        .with_context(|| format!("Cannot open {}", cli.device.display()))?;
    let iface = select_backend(&card, cli.driver_name.as_deref())?;

    match cli.command {
        Commands::Info => show_info(&card, iface)?,

        Commands::Cursor { plane } => {
            iface.init_plane_for_cursor(&card, plane)?;
            println!("{} Cursor plane {} initialised", "✅".green(), plane);
        }

        Commands::Dumb {
            bpp,
            width,
            height,
            non_scanout,
        } => {
            let create = CreateGem {
                buf_type: if non_scanout {
                    BufferType::NonScanout
                } else {
                    BufferType::Scanout
                },
                ..CreateGem::new(bpp, width, height)
            };
            let buffer = iface
                .create_custom_gem(&card, &create)
                .with_context(|| format!("{}x{}@{}bpp allocation failed", width, height, bpp))?;

            println!("{} Buffer allocated", "✅".green());
            println!("  Handle: {}", buffer.handle);
            println!("  Pitch:  {} bytes", buffer.pitch);
            println!("  Size:   {} bytes", buffer.size);
        }
    }

    Ok(())
}

fn select_backend(
    card: &Card,
    driver_name: Option<&str>,
) -> Result<&'static dyn DrmModeInterface> {
    let iface = match driver_name {
        Some(name) => {
            log::info!("Backend forced to {}", name);
            find_interface(name)?
        }
        None => interface_for_device(card)?,
    };
    Ok(iface)
}

fn show_info(card: &Card, iface: &dyn DrmModeInterface) -> Result<()> {
    let version = card.version().context("DRM_IOCTL_VERSION failed")?;
    let desc = iface.descriptor();

    println!("{}", "DRM device".bold());
    println!("  Node:    {}", card.path().display());
    println!(
        "  Driver:  {} {}.{}.{} ({})",
        version.name, version.major, version.minor, version.patchlevel, version.date
    );
    println!("  Desc:    {}", version.desc);
    println!();
    println!("{}", "Backend".bold());
    println!("  Name:              {}", desc.driver_name.cyan());
    println!("  Page-flip events:  {}", yes_no(desc.use_page_flip_events()));
    println!("  Early display:     {}", yes_no(desc.use_early_display()));
    println!("  VBlank query:      {}", yes_no(desc.vblank_query_supported()));
    println!("  Cursor API:        {}", cursor_api_name(desc.cursor_api));
    println!(
        "  Cursor:            {}x{} (padding {})",
        desc.cursor.width, desc.cursor.height, desc.cursor.padding
    );

    Ok(())
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}

fn cursor_api_name(api: CursorApi) -> &'static str {
    match api {
        CursorApi::Plane => "overlay plane",
        CursorApi::Standard => "legacy cursor ioctl",
        CursorApi::None => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dumb() {
        let cli = Cli::try_parse_from([
            "drmmode-probe",
            "--device",
            "/dev/dri/card1",
            "dumb",
            "--width",
            "1920",
            "--height",
            "1080",
        ])
        .unwrap();

        assert_eq!(cli.device, PathBuf::from("/dev/dri/card1"));
        match cli.command {
            Commands::Dumb {
                bpp,
                width,
                height,
                non_scanout,
            } => {
                assert_eq!((bpp, width, height), (32, 1920, 1080));
                assert!(!non_scanout);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_cursor_requires_plane() {
        assert!(Cli::try_parse_from(["drmmode-probe", "cursor"]).is_err());
    }
}
