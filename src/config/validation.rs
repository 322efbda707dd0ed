//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
///
/// Runs before any network activity; the first problem found is returned.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_required("HOST_URL", &config.source.host_url)?;
    validate_required("IMG_URL", &config.source.image_url)?;
    validate_required("XML_URL", &config.source.playlist_url)?;
    validate_required(
        "OUT_FOLDER",
        &config.output.out_folder.to_string_lossy(),
    )?;

    validate_host_url(&config.source.host_url)?;
    validate_resource_url("IMG_URL", config.image_url())?;
    validate_resource_url("XML_URL", config.playlist_url())?;

    if let Some(webhook) = &config.notify.webhook_url {
        validate_webhook_url(webhook)?;
    }

    validate_output(config)?;
    validate_probe(config)?;

    Ok(())
}

/// Validate that a required value is present and not blank.
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }
    Ok(())
}

/// Validate the storage host URL.
pub fn validate_host_url(host_url: &str) -> Result<()> {
    let parsed = url::Url::parse(host_url.trim()).map_err(|e| Error::ConfigValidation {
        field: "HOST_URL".to_string(),
        message: format!("'{}' is not a valid URL: {}", host_url, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: "HOST_URL".to_string(),
            message: format!("Unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

fn validate_resource_url(field: &str, resolved: Result<String>) -> Result<()> {
    resolved.map(|_| ()).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("Could not resolve against HOST_URL: {}", e),
    })
}

/// Validate the webhook URL when one is configured.
pub fn validate_webhook_url(webhook: &str) -> Result<()> {
    url::Url::parse(webhook.trim()).map_err(|e| Error::ConfigValidation {
        field: "WEBHOOK_URL".to_string(),
        message: format!("'{}' is not a valid URL: {}", webhook, e),
    })?;
    Ok(())
}

fn validate_output(config: &Config) -> Result<()> {
    if config.output.placeholder.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "placeholder".to_string(),
            message: "Placeholder cannot be empty".to_string(),
        });
    }

    if config.output.playlist_name.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "playlist_name".to_string(),
            message: "Playlist name cannot be empty".to_string(),
        });
    }

    Ok(())
}

fn validate_probe(config: &Config) -> Result<()> {
    if config.probe.max_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "PROBE_ATTEMPTS".to_string(),
            message: "At least one probe attempt is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_valid_config() -> Config {
        let mut config = Config::default();
        config.source.host_url = "https://bucket.example.com/".to_string();
        config.source.image_url = "out.jpg".to_string();
        config.source.playlist_url = "https://bucket.example.com/dv_signage.xml".to_string();
        config.output.out_folder = PathBuf::from("/srv/piink/out");
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&make_valid_config()).is_ok());
    }

    #[test]
    fn test_each_required_value() {
        let cases: [(&str, fn(&mut Config)); 4] = [
            ("HOST_URL", |c| c.source.host_url.clear()),
            ("IMG_URL", |c| c.source.image_url = "  ".to_string()),
            ("XML_URL", |c| c.source.playlist_url.clear()),
            ("OUT_FOLDER", |c| c.output.out_folder = PathBuf::new()),
        ];

        for (field, clear) in cases {
            let mut config = make_valid_config();
            clear(&mut config);
            match validate_config(&config) {
                Err(Error::MissingConfig(name)) => assert_eq!(name, field),
                other => panic!("expected MissingConfig({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_host_url_scheme() {
        let mut config = make_valid_config();
        config.source.host_url = "ftp://bucket.example.com/".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_webhook_optional_but_checked() {
        let mut config = make_valid_config();
        config.notify.webhook_url = Some("https://chat.example.com/hook".to_string());
        assert!(validate_config(&config).is_ok());

        config.notify.webhook_url = Some("chat hook".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_probe_attempts() {
        let mut config = make_valid_config();
        config.probe.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }
}
