//! Locale metadata lookup
//!
//! Maps WordPress locale codes (e.g., "de_DE") to ISO 639 codes and display
//! names. The ISO code is only used to order and deduplicate catalogs.

#[cfg(test)]
use mockall::automock;

/// Metadata for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub wp_locale: String,
    pub slug: String,
    pub iso_639_1: Option<String>,
    pub iso_639_2: Option<String>,
    pub iso_639_3: Option<String>,
    pub english_name: String,
    pub native_name: String,
}

/// How specific an ISO key is. Higher is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IsoSpecificity {
    Iso6391,
    Iso6392,
    Iso6393,
}

impl Locale {
    /// Best available ISO code, preferring 639-3, then 639-2, then 639-1
    pub fn iso_key(&self) -> Option<(&str, IsoSpecificity)> {
        fn non_empty(code: &Option<String>) -> Option<&str> {
            code.as_deref().filter(|c| !c.is_empty())
        }

        non_empty(&self.iso_639_3)
            .map(|c| (c, IsoSpecificity::Iso6393))
            .or_else(|| non_empty(&self.iso_639_2).map(|c| (c, IsoSpecificity::Iso6392)))
            .or_else(|| non_empty(&self.iso_639_1).map(|c| (c, IsoSpecificity::Iso6391)))
    }
}

/// Field used to look a locale up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleField {
    /// WordPress locale code, e.g. "pt_BR"
    WpLocale,
    /// translate.wordpress.org slug, e.g. "pt-br"
    Slug,
}

/// Locale metadata source
#[cfg_attr(test, automock)]
pub trait LocaleResolver: Send + Sync {
    fn by_field(&self, field: LocaleField, value: &str) -> Option<Locale>;
}

/// (wp_locale, slug, 639-1, 639-2, 639-3, english name, native name)
type LocaleRow = (
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
    &'static str,
    &'static str,
);

const LOCALES: &[LocaleRow] = &[
    ("af", "af", Some("af"), Some("afr"), None, "Afrikaans", "Afrikaans"),
    ("ar", "ar", Some("ar"), Some("ara"), None, "Arabic", "العربية"),
    ("ary", "ary", Some("ar"), Some("ara"), Some("ary"), "Moroccan Arabic", "العربية المغربية"),
    ("ast", "ast", None, Some("ast"), None, "Asturian", "Asturianu"),
    ("bg_BG", "bg", Some("bg"), Some("bul"), None, "Bulgarian", "Български"),
    ("bn_BD", "bn", Some("bn"), None, None, "Bengali (Bangladesh)", "বাংলা"),
    ("ca", "ca", Some("ca"), Some("cat"), None, "Catalan", "Català"),
    ("cs_CZ", "cs", Some("cs"), Some("ces"), None, "Czech", "Čeština"),
    ("cy", "cy", Some("cy"), Some("cym"), None, "Welsh", "Cymraeg"),
    ("da_DK", "da", Some("da"), Some("dan"), None, "Danish", "Dansk"),
    ("de_CH", "de-ch", Some("de"), Some("gsw"), None, "German (Switzerland)", "Deutsch (Schweiz)"),
    ("de_DE", "de", Some("de"), Some("ger"), None, "German", "Deutsch"),
    ("de_DE_formal", "de/formal", Some("de"), Some("ger"), None, "German (Formal)", "Deutsch (Sie)"),
    ("el", "el", Some("el"), Some("ell"), None, "Greek", "Ελληνικά"),
    ("en_AU", "en-au", Some("en"), Some("eng"), None, "English (Australia)", "English (Australia)"),
    ("en_CA", "en-ca", Some("en"), Some("eng"), None, "English (Canada)", "English (Canada)"),
    ("en_GB", "en-gb", Some("en"), Some("eng"), None, "English (UK)", "English (UK)"),
    ("en_US", "en", Some("en"), Some("eng"), None, "English", "English"),
    ("eo", "eo", Some("eo"), Some("epo"), None, "Esperanto", "Esperanto"),
    ("es_AR", "es-ar", Some("es"), Some("spa"), None, "Spanish (Argentina)", "Español de Argentina"),
    ("es_ES", "es", Some("es"), Some("spa"), None, "Spanish (Spain)", "Español"),
    ("es_MX", "es-mx", Some("es"), Some("spa"), None, "Spanish (Mexico)", "Español de México"),
    ("et", "et", Some("et"), Some("est"), None, "Estonian", "Eesti"),
    ("eu", "eu", Some("eu"), Some("eus"), None, "Basque", "Euskara"),
    ("fa_IR", "fa", Some("fa"), Some("fas"), None, "Persian", "فارسی"),
    ("fi", "fi", Some("fi"), Some("fin"), None, "Finnish", "Suomi"),
    ("fr_BE", "fr-be", Some("fr"), Some("fra"), None, "French (Belgium)", "Français de Belgique"),
    ("fr_CA", "fr-ca", Some("fr"), Some("fra"), None, "French (Canada)", "Français du Canada"),
    ("fr_FR", "fr", Some("fr"), Some("fre"), None, "French (France)", "Français"),
    ("gl_ES", "gl", Some("gl"), Some("glg"), None, "Galician", "Galego"),
    ("he_IL", "he", Some("he"), None, None, "Hebrew", "עִבְרִית"),
    ("hi_IN", "hi", Some("hi"), Some("hin"), None, "Hindi", "हिन्दी"),
    ("hr", "hr", Some("hr"), Some("hrv"), None, "Croatian", "Hrvatski"),
    ("hu_HU", "hu", Some("hu"), Some("hun"), None, "Hungarian", "Magyar"),
    ("id_ID", "id", Some("id"), Some("ind"), None, "Indonesian", "Bahasa Indonesia"),
    ("it_IT", "it", Some("it"), Some("ita"), None, "Italian", "Italiano"),
    ("ja", "ja", Some("ja"), None, None, "Japanese", "日本語"),
    ("ko_KR", "ko", Some("ko"), Some("kor"), None, "Korean", "한국어"),
    ("lt_LT", "lt", Some("lt"), Some("lit"), None, "Lithuanian", "Lietuvių kalba"),
    ("nb_NO", "nb", Some("nb"), Some("nob"), None, "Norwegian (Bokmål)", "Norsk bokmål"),
    ("nl_NL", "nl", Some("nl"), Some("dut"), None, "Dutch", "Nederlands"),
    ("nl_NL_formal", "nl/formal", Some("nl"), Some("dut"), None, "Dutch (Formal)", "Nederlands (Formeel)"),
    ("pl_PL", "pl", Some("pl"), Some("pol"), None, "Polish", "Polski"),
    ("pt_BR", "pt-br", Some("pt"), Some("por"), None, "Portuguese (Brazil)", "Português do Brasil"),
    ("pt_PT", "pt", Some("pt"), None, None, "Portuguese (Portugal)", "Português"),
    ("ro_RO", "ro", Some("ro"), Some("rum"), None, "Romanian", "Română"),
    ("ru_RU", "ru", Some("ru"), Some("rus"), None, "Russian", "Русский"),
    ("sk_SK", "sk", Some("sk"), Some("slo"), None, "Slovak", "Slovenčina"),
    ("sl_SI", "sl", Some("sl"), Some("slv"), None, "Slovenian", "Slovenščina"),
    ("sr_RS", "sr", Some("sr"), Some("srp"), None, "Serbian", "Српски језик"),
    ("sv_SE", "sv", Some("sv"), Some("swe"), None, "Swedish", "Svenska"),
    ("th", "th", Some("th"), Some("tha"), None, "Thai", "ไทย"),
    ("tr_TR", "tr", Some("tr"), Some("tur"), None, "Turkish", "Türkçe"),
    ("uk", "uk", Some("uk"), Some("ukr"), None, "Ukrainian", "Українська"),
    ("vi", "vi", Some("vi"), Some("vie"), None, "Vietnamese", "Tiếng Việt"),
    ("zh_CN", "zh-cn", Some("zh"), Some("zho"), None, "Chinese (China)", "简体中文"),
    ("zh_TW", "zh-tw", Some("zh"), Some("zho"), None, "Chinese (Taiwan)", "繁體中文"),
];

/// Locale resolver over a fixed table
pub struct StaticLocaleResolver {
    locales: Vec<Locale>,
}

impl Default for StaticLocaleResolver {
    fn default() -> Self {
        let locales = LOCALES
            .iter()
            .map(
                |&(wp_locale, slug, iso_639_1, iso_639_2, iso_639_3, english_name, native_name)| {
                    Locale {
                        wp_locale: wp_locale.to_string(),
                        slug: slug.to_string(),
                        iso_639_1: iso_639_1.map(str::to_string),
                        iso_639_2: iso_639_2.map(str::to_string),
                        iso_639_3: iso_639_3.map(str::to_string),
                        english_name: english_name.to_string(),
                        native_name: native_name.to_string(),
                    }
                },
            )
            .collect();
        Self::new(locales)
    }
}

impl StaticLocaleResolver {
    pub fn new(locales: Vec<Locale>) -> Self {
        Self { locales }
    }
}

impl LocaleResolver for StaticLocaleResolver {
    fn by_field(&self, field: LocaleField, value: &str) -> Option<Locale> {
        self.locales
            .iter()
            .find(|locale| match field {
                LocaleField::WpLocale => locale.wp_locale == value,
                LocaleField::Slug => locale.slug == value,
            })
            .cloned()
    }
}
