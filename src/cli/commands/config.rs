//! Resolved configuration display.

use crate::config::{AuthConfig, ResolvedConfig};
use crate::ui::Style;

/// Prints the resolved configuration. The bearer token is never shown.
pub fn print_config(config: &ResolvedConfig) {
    println!("{}", Style::header("Resolved configuration"));
    print_row("model_id", &Style::value(&config.model_id));
    print_row("service_endpoint", &Style::value(&config.service_endpoint));
    print_row("compartment_id", &Style::value(&config.compartment_id));
    match &config.auth {
        AuthConfig::Token(_) => {
            print_row("auth", &Style::value("bearer token"));
            print_row("auth_token", &Style::secondary("(set)"));
        }
        AuthConfig::ApiKey {
            config_file,
            profile,
        } => {
            print_row("auth", &Style::value("api key"));
            print_row("oci_config_file", &Style::value(config_file.display()));
            print_row("oci_profile", &Style::value(profile));
        }
    }
    print_row(
        "timeout",
        &Style::value(format!("{}s", config.timeout.as_secs())),
    );
    print_row("temperature", &Style::value(config.temperature));
    print_row("max_tokens", &Style::value(config.max_tokens));
    print_row("listen", &Style::value(config.listen_addr()));
}

fn print_row(label: &str, value: &str) {
    println!("  {:18} {value}", Style::label(label));
}
