use crate::config::types::{Config, HarvestConfig, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use std::ops::RangeInclusive;
use url::Url;

const TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=300;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

/// Checks every section of a parsed configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    check_harvest(&config.harvest)?;
    check_user_agent(&config.user_agent)?;
    check_output(&config.output)
}

fn check_harvest(harvest: &HarvestConfig) -> ConfigResult<()> {
    if harvest.sites.is_empty() {
        return Err(invalid("[harvest] sites must list at least one site"));
    }

    for site in &harvest.sites {
        check_site(site)?;
    }

    if !TIMEOUT_RANGE_SECS.contains(&harvest.request_timeout_secs) {
        return Err(invalid(format!(
            "[harvest] request-timeout-secs must be within {}..={}, got {}",
            TIMEOUT_RANGE_SECS.start(),
            TIMEOUT_RANGE_SECS.end(),
            harvest.request_timeout_secs
        )));
    }

    Ok(())
}

/// A site is a site root or robots.txt URL reachable over http(s)
fn check_site(site: &str) -> ConfigResult<()> {
    let url = Url::parse(site)
        .map_err(|e| ConfigError::InvalidUrl(format!("site '{}': {}", site, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "site '{}' uses scheme '{}', expected http or https",
            site,
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("site '{}' has no host", site)));
    }

    Ok(())
}

fn check_user_agent(user_agent: &UserAgentConfig) -> ConfigResult<()> {
    let name = &user_agent.crawler_name;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid(format!(
            "[user-agent] crawler-name must be non-empty letters, digits and hyphens, got '{}'",
            name
        )));
    }

    if user_agent.crawler_version.trim().is_empty() {
        return Err(invalid("[user-agent] crawler-version cannot be blank"));
    }

    if let Some(contact_url) = &user_agent.contact_url {
        Url::parse(contact_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("[user-agent] contact-url '{}': {}", contact_url, e))
        })?;
    }

    match &user_agent.contact_email {
        Some(email) if !looks_like_email(email) => Err(invalid(format!(
            "[user-agent] contact-email '{}' is not an email address",
            email
        ))),
        _ => Ok(()),
    }
}

fn check_output(output: &OutputConfig) -> ConfigResult<()> {
    if output.database_path.trim().is_empty() {
        return Err(invalid("[output] database-path cannot be blank"));
    }
    if output.image_dir.trim().is_empty() {
        return Err(invalid("[output] image-dir cannot be blank"));
    }
    Ok(())
}

/// `local@domain.tld` with exactly one `@` and a dotted domain
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
