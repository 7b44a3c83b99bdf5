//! User-facing message catalogs.

use std::collections::HashMap;

const EN: &[(&str, &str)] = &[
    ("share.created", "Share link created successfully"),
    (
        "share.created_and_emailed",
        "Share link created and sent by email",
    ),
    ("share.email_subject", "Health records shared with you"),
    (
        "share.email_greeting",
        "Hello {name},",
    ),
    (
        "share.email_body",
        "Health records have been shared with you. Open them here: {url}",
    ),
    ("share.email_purpose", "Purpose: {purpose}"),
    ("share.email_expiry", "This link expires on {expires}."),
    ("share.default_recipient", "there"),
];

const ES: &[(&str, &str)] = &[
    ("share.created", "Enlace compartido creado correctamente"),
    (
        "share.created_and_emailed",
        "Enlace compartido creado y enviado por correo",
    ),
    ("share.email_subject", "Se han compartido registros de salud contigo"),
    ("share.email_greeting", "Hola {name}:"),
    (
        "share.email_body",
        "Se han compartido registros de salud contigo. Ábrelos aquí: {url}",
    ),
    ("share.email_purpose", "Motivo: {purpose}"),
    ("share.email_expiry", "Este enlace caduca el {expires}."),
    ("share.default_recipient", "hola"),
];

/// Locale-keyed message lookup with fallback to the default locale, then the key.
#[derive(Debug, Clone)]
pub struct Translator {
    default_locale: String,
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Translator {
    pub fn new(default_locale: &str) -> Self {
        let catalogs = [("en", EN), ("es", ES)]
            .into_iter()
            .map(|(locale, entries)| (locale, entries.iter().copied().collect()))
            .collect();

        Self {
            default_locale: normalize(default_locale),
            catalogs,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        [locale, self.default_locale.as_str()]
            .into_iter()
            .find_map(|candidate| self.catalogs.get(candidate)?.get(key).copied())
            .unwrap_or(key)
    }

    /// Translate and substitute `{name}` placeholders.
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(
            self.translate(locale, key).to_string(),
            |text, (name, value)| text.replace(&format!("{{{}}}", name), value),
        )
    }

    /// Pick the locale named by the first `Accept-Language` tag, if supported.
    pub fn negotiate(&self, accept_language: Option<&str>) -> String {
        accept_language
            .and_then(|header| header.split(',').next())
            .map(|tag| normalize(tag.split(';').next().unwrap_or(tag)))
            .filter(|locale| self.supports(locale))
            .unwrap_or_else(|| self.default_locale.clone())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new("en")
    }
}

/// `es-MX` → `es`
fn normalize(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_keys() {
        let translator = Translator::new("en");
        assert_eq!(
            translator.translate("es", "share.created"),
            "Enlace compartido creado correctamente"
        );
    }

    #[test]
    fn falls_back_to_default_locale_then_key() {
        let translator = Translator::new("en");
        assert_eq!(
            translator.translate("fr", "share.created"),
            "Share link created successfully"
        );
        assert_eq!(translator.translate("es", "no.such.key"), "no.such.key");
    }

    #[test]
    fn negotiates_first_accept_language_tag() {
        let translator = Translator::new("en");
        assert_eq!(translator.negotiate(Some("es-MX,es;q=0.9,en;q=0.8")), "es");
        assert_eq!(translator.negotiate(Some("de-DE,es;q=0.9")), "en");
        assert_eq!(translator.negotiate(None), "en");
    }

    #[test]
    fn format_substitutes_placeholders() {
        let translator = Translator::default();
        assert_eq!(
            translator.format("en", "share.email_greeting", &[("name", "Dr. Lee")]),
            "Hello Dr. Lee,"
        );
    }
}
