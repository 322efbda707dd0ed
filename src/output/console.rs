//! Console output utilities.

use console::style;

use crate::config::Config;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     PiInk Fetch                                       ║
║     Signage image + playlist publisher                ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(config: &Config) {
    let webhook = if config.notify.webhook_url.is_some() {
        style("enabled").green()
    } else {
        style("disabled").yellow()
    };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Image:    {}", config.source.image_url);
    println!("  Playlist: {}", config.source.playlist_url);
    println!("  Staging:  {}", config.output.staging_dir.display());
    println!("  Output:   {}", config.output.out_folder.display());
    println!("  Webhook:  {}", webhook);
    println!(
        "  Patch:    {} (on failure: {})",
        config.options.patch_mode, config.options.on_failure
    );
    println!();
}
