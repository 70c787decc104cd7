//! Image reference parsing: `NAME[:TAG][@DIGEST]`.

use std::fmt;

use thiserror::Error;

/// Tag applied when a reference names neither a tag nor a digest.
pub const DEFAULT_TAG: &str = "latest";

/// Registry assumed when the name carries no domain.
pub const DEFAULT_REGISTRY: &str = "docker.io";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("empty image reference")]
    Empty,

    #[error("invalid reference format: {0}")]
    InvalidName(String),

    #[error("invalid tag {tag:?} in reference {reference:?}")]
    InvalidTag { reference: String, tag: String },

    #[error("invalid digest {digest:?} in reference {reference:?}")]
    InvalidDigest { reference: String, digest: String },
}

/// A parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl Reference {
    /// Parse `NAME[:TAG][@DIGEST]`.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let (rest, digest) = match input.split_once('@') {
            Some((rest, digest)) => {
                if !is_valid_digest(digest) {
                    return Err(ReferenceError::InvalidDigest {
                        reference: input.to_string(),
                        digest: digest.to_string(),
                    });
                }
                (rest, Some(digest.to_string()))
            }
            None => (input, None),
        };

        // A ':' after the last '/' separates the tag; earlier ones are ports.
        let last_slash = rest.rfind('/').map_or(0, |i| i + 1);
        let (name, tag) = match rest[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                (&rest[..split], Some(&rest[split + 1..]))
            }
            None => (rest, None),
        };

        if let Some(tag) = tag.filter(|t| !is_valid_tag(t)) {
            return Err(ReferenceError::InvalidTag {
                reference: input.to_string(),
                tag: tag.to_string(),
            });
        }
        if !is_valid_name(name) {
            return Err(ReferenceError::InvalidName(input.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.map(str::to_string),
            digest,
        })
    }

    /// Repository name without tag or digest.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Add [`DEFAULT_TAG`] when the reference has neither tag nor digest.
    pub fn with_default_tag(mut self) -> Self {
        if self.tag.is_none() && self.digest.is_none() {
            self.tag = Some(DEFAULT_TAG.to_string());
        }
        self
    }

    /// Drop the tag when a digest pins the content anyway.
    pub fn trim_tag_for_digest(mut self) -> Self {
        if self.digest.is_some() {
            self.tag = None;
        }
        self
    }

    /// Registry host the name points at.
    pub fn registry(&self) -> &str {
        match self.name.split_once('/') {
            Some((first, _)) if is_domain(first) => first,
            _ => DEFAULT_REGISTRY,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

fn is_domain(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

fn is_valid_name(name: &str) -> bool {
    let mut components = name.split('/').peekable();
    let mut first = true;
    while let Some(component) = components.next() {
        let is_registry = first && components.peek().is_some() && is_domain(component);
        first = false;
        let valid = if is_registry {
            is_valid_domain(component)
        } else {
            is_valid_path_component(component)
        };
        if !valid {
            return false;
        }
    }
    true
}

fn is_valid_domain(domain: &str) -> bool {
    let (host, port) = match domain.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (domain, None),
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let port_ok = port.is_none_or(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    host_ok && port_ok
}

fn is_valid_path_component(component: &str) -> bool {
    let starts_ok = component
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    starts_ok
        && component
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

fn is_valid_tag(tag: &str) -> bool {
    tag.len() <= 128
        && tag
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn is_valid_digest(digest: &str) -> bool {
    match digest.split_once(':') {
        Some((algorithm, hex)) => {
            !algorithm.is_empty()
                && algorithm
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+')
                && hex.len() >= 32
                && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "sha256:300a28bded4df40cd59c7f3711b9f0fd4fc94100d07c3c1eeabdd449773cfdcf";

    #[test]
    fn test_parse_name_only() {
        let r = Reference::parse("busybox").unwrap();
        assert_eq!(r.name(), "busybox");
        assert_eq!(r.tag(), None);
        assert_eq!(r.digest(), None);
        assert_eq!(r.registry(), DEFAULT_REGISTRY);
    }

    #[test]
    fn test_parse_tag_and_registry_port() {
        let r = Reference::parse("localhost:5000/library/redis:alpine").unwrap();
        assert_eq!(r.name(), "localhost:5000/library/redis");
        assert_eq!(r.tag(), Some("alpine"));
        assert_eq!(r.registry(), "localhost:5000");

        let r = Reference::parse("registry.example.com:443/app").unwrap();
        assert_eq!(r.name(), "registry.example.com:443/app");
        assert_eq!(r.tag(), None);
    }

    #[test]
    fn test_parse_digest() {
        let r = Reference::parse(&format!("docker.io/library/redis:alpine@{DIGEST}")).unwrap();
        assert_eq!(r.name(), "docker.io/library/redis");
        assert_eq!(r.tag(), Some("alpine"));
        assert_eq!(r.digest(), Some(DIGEST));
        assert_eq!(r.registry(), "docker.io");
    }

    #[test]
    fn test_default_tag() {
        let r = Reference::parse("redis").unwrap().with_default_tag();
        assert_eq!(r.to_string(), "redis:latest");

        let r = Reference::parse("redis:7").unwrap().with_default_tag();
        assert_eq!(r.to_string(), "redis:7");

        let r = Reference::parse(&format!("redis@{DIGEST}"))
            .unwrap()
            .with_default_tag();
        assert_eq!(r.tag(), None);
    }

    #[test]
    fn test_trim_tag_for_digest() {
        let r = Reference::parse(&format!("redis:7@{DIGEST}"))
            .unwrap()
            .trim_tag_for_digest();
        assert_eq!(r.to_string(), format!("redis@{DIGEST}"));

        let r = Reference::parse("redis:7").unwrap().trim_tag_for_digest();
        assert_eq!(r.tag(), Some("7"));
    }

    #[test]
    fn test_invalid_references() {
        assert_eq!(Reference::parse("  "), Err(ReferenceError::Empty));
        assert!(matches!(
            Reference::parse("Redis"),
            Err(ReferenceError::InvalidName(_))
        ));
        assert!(matches!(
            Reference::parse("redis:"),
            Err(ReferenceError::InvalidTag { .. })
        ));
        assert!(matches!(
            Reference::parse("redis@sha256:xyz"),
            Err(ReferenceError::InvalidDigest { .. })
        ));
        assert!(matches!(
            Reference::parse("a//b"),
            Err(ReferenceError::InvalidName(_))
        ));
    }
}
