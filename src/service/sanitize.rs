//! Input sanitizers applied by `submit_form` before anything reaches storage.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)>").expect("valid regex")
});
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static OCTETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));
static LOCAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid regex"));
static LOCAL_PART_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]").expect("valid regex"));
static SUBDOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("valid regex"));
static SUBDOMAIN_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("valid regex"));
static PERIOD_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid regex"));

fn strip_markup(input: &str) -> String {
    let without_blocks = SCRIPT_STYLE.replace_all(input, "");
    TAGS.replace_all(&without_blocks, "").into_owned()
}

fn strip_octets(input: &str) -> String {
    let mut current = input.to_string();
    // Removing one octet can expose another, e.g. `%4%141`.
    loop {
        let next = OCTETS.replace_all(&current, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_field(input: &str, keep_newlines: bool) -> String {
    let stripped = strip_markup(input);
    let filtered: String = stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n' || *c == '\r')
        .collect();
    let filtered = strip_octets(&filtered);

    if keep_newlines {
        filtered.trim().to_string()
    } else {
        WHITESPACE_RUNS
            .replace_all(filtered.trim(), " ")
            .into_owned()
    }
}

/// Single-line text: markup and control characters removed, whitespace
/// runs collapsed to one space, trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    sanitize_field(input, false)
}

/// Multi-line text: like [`sanitize_text_field`] but line breaks survive.
pub fn sanitize_textarea_field(input: &str) -> String {
    sanitize_field(input, true)
}

fn trim_domain(domain: &str) -> &str {
    domain.trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == '\x0B' || c == '.')
}

/// Strip characters that cannot appear in an address. Returns an empty
/// string when what remains cannot be an address at all.
pub fn sanitize_email(input: &str) -> String {
    let email = input.trim();
    if email.len() < 6 {
        return String::new();
    }
    let Some(at) = email.find('@') else {
        return String::new();
    };
    if at == 0 {
        return String::new();
    }
    let (local, domain) = (&email[..at], &email[at + 1..]);

    let local = LOCAL_PART_INVALID.replace_all(local, "");
    if local.is_empty() {
        return String::new();
    }

    let domain = PERIOD_RUNS.replace_all(domain, "");
    let domain = trim_domain(&domain);
    if domain.is_empty() {
        return String::new();
    }

    let subs: Vec<String> = domain
        .split('.')
        .map(|sub| {
            let sub = sub.trim_matches(|c: char| c.is_whitespace() || c == '-');
            SUBDOMAIN_INVALID.replace_all(sub, "").into_owned()
        })
        .filter(|sub| !sub.is_empty())
        .collect();
    if subs.len() < 2 {
        return String::new();
    }

    format!("{}@{}", local, subs.join("."))
}

/// Address syntax check: non-empty local part of allowed characters, and a
/// domain of at least two dot-separated labels of letters, digits and inner
/// hyphens.
pub fn is_email(email: &str) -> bool {
    if email.len() < 6 {
        return false;
    }
    let Some(at) = email.find('@') else {
        return false;
    };
    if at == 0 {
        return false;
    }
    let (local, domain) = (&email[..at], &email[at + 1..]);

    if !LOCAL_PART.is_match(local) {
        return false;
    }
    if domain.contains("..") {
        return false;
    }
    if trim_domain(domain) != domain {
        return false;
    }

    let subs: Vec<&str> = domain.split('.').collect();
    if subs.len() < 2 {
        return false;
    }
    subs.iter().all(|sub| {
        !sub.is_empty()
            && sub.trim_matches(|c: char| c.is_whitespace() || c == '-') == *sub
            && SUBDOMAIN.is_match(sub)
    })
}
