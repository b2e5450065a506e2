use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cookbook".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cookbook-users".into()),
            ttl_minutes: parse_minutes(std::env::var("JWT_TTL_MINUTES").ok(), 60)?,
        };
        Ok(Self { database_url, jwt })
    }
}

/// Longest accepted token lifetime: one year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

fn parse_minutes(raw: Option<String>, default: i64) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("JWT_TTL_MINUTES is not a number: {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}"
    );
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_when_unset() {
        assert_eq!(parse_minutes(None, 60).unwrap(), 60);
        assert_eq!(parse_minutes(Some("15".into()), 60).unwrap(), 15);
    }

    #[test]
    fn ttl_rejects_garbage_and_out_of_range() {
        assert!(parse_minutes(Some("soon".into()), 60).is_err());
        assert!(parse_minutes(Some("0".into()), 60).is_err());
        assert!(parse_minutes(Some("-5".into()), 60).is_err());
        assert!(parse_minutes(Some(i64::MAX.to_string()), 60).is_err());
        assert!(parse_minutes(Some((MAX_TTL_MINUTES + 1).to_string()), 60).is_err());
        assert_eq!(
            parse_minutes(Some(MAX_TTL_MINUTES.to_string()), 60).unwrap(),
            MAX_TTL_MINUTES
        );
    }
}
