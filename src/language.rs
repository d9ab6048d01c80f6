use icu_locale::Locale;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref ALIASES: HashMap<&'static str, &'static str> = HashMap::from([
        ("punjabi", "pa"),
        ("english", "en"),
        ("spanish", "es"),
        ("french", "fr"),
        ("german", "de"),
        ("italian", "it"),
        ("chinese", "zh"),
        ("japanese", "ja"),
        ("korean", "ko"),
        ("russian", "ru"),
        ("hindi", "hi"),
        ("arabic", "ar"),
        ("sindhi", "sd"),
        ("urdu", "ur"),
        ("bengali", "bn"),
        ("bangla", "bn"),
        ("portuguese", "pt"),
        ("turkish", "tr"),
        ("persian", "fa"),
        ("farsi", "fa"),
        ("dutch", "nl"),
        ("tamil", "ta"),
        ("telugu", "te"),
        ("marathi", "mr"),
        ("gujarati", "gu"),
        ("pashto", "ps"),
    ]);

    // ISO 639-1 reference names
    static ref ISO_639_1: HashMap<&'static str, &'static str> = HashMap::from([
        ("afrikaans", "af"),
        ("albanian", "sq"),
        ("amharic", "am"),
        ("armenian", "hy"),
        ("assamese", "as"),
        ("azerbaijani", "az"),
        ("basque", "eu"),
        ("belarusian", "be"),
        ("bosnian", "bs"),
        ("bulgarian", "bg"),
        ("burmese", "my"),
        ("catalan", "ca"),
        ("corsican", "co"),
        ("croatian", "hr"),
        ("czech", "cs"),
        ("danish", "da"),
        ("dhivehi", "dv"),
        ("esperanto", "eo"),
        ("estonian", "et"),
        ("filipino", "tl"),
        ("finnish", "fi"),
        ("frisian", "fy"),
        ("galician", "gl"),
        ("georgian", "ka"),
        ("greek", "el"),
        ("guarani", "gn"),
        ("haitian creole", "ht"),
        ("hausa", "ha"),
        ("hebrew", "he"),
        ("hungarian", "hu"),
        ("icelandic", "is"),
        ("igbo", "ig"),
        ("indonesian", "id"),
        ("irish", "ga"),
        ("javanese", "jv"),
        ("kannada", "kn"),
        ("kashmiri", "ks"),
        ("kazakh", "kk"),
        ("khmer", "km"),
        ("kinyarwanda", "rw"),
        ("kurdish", "ku"),
        ("kyrgyz", "ky"),
        ("lao", "lo"),
        ("latin", "la"),
        ("latvian", "lv"),
        ("lingala", "ln"),
        ("lithuanian", "lt"),
        ("luxembourgish", "lb"),
        ("macedonian", "mk"),
        ("malagasy", "mg"),
        ("malay", "ms"),
        ("malayalam", "ml"),
        ("maltese", "mt"),
        ("maori", "mi"),
        ("mongolian", "mn"),
        ("nepali", "ne"),
        ("norwegian", "no"),
        ("nyanja", "ny"),
        ("odia", "or"),
        ("oriya", "or"),
        ("oromo", "om"),
        ("polish", "pl"),
        ("quechua", "qu"),
        ("romanian", "ro"),
        ("samoan", "sm"),
        ("sanskrit", "sa"),
        ("scottish gaelic", "gd"),
        ("serbian", "sr"),
        ("shona", "sn"),
        ("sinhala", "si"),
        ("slovak", "sk"),
        ("slovenian", "sl"),
        ("somali", "so"),
        ("sotho", "st"),
        ("sundanese", "su"),
        ("swahili", "sw"),
        ("swedish", "sv"),
        ("tajik", "tg"),
        ("tatar", "tt"),
        ("thai", "th"),
        ("tibetan", "bo"),
        ("tigrinya", "ti"),
        ("tsonga", "ts"),
        ("turkmen", "tk"),
        ("twi", "tw"),
        ("ukrainian", "uk"),
        ("uyghur", "ug"),
        ("uzbek", "uz"),
        ("vietnamese", "vi"),
        ("welsh", "cy"),
        ("xhosa", "xh"),
        ("yiddish", "yi"),
        ("yoruba", "yo"),
        ("zulu", "zu"),
    ]);
}

/// Resolve a human readable language name (or tag) to a language code.
///
/// Returns `None` when neither the alias table nor the general lookup
/// knows the name.
pub fn resolve(name: &str) -> Option<String> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(code) = ALIASES.get(key.as_str()) {
        return Some((*code).to_string());
    }

    lookup_general(&key)
}

fn lookup_general(key: &str) -> Option<String> {
    if let Some(code) = ISO_639_1.get(key) {
        return Some((*code).to_string());
    }

    let locale: Locale = key.parse().ok()?;
    let language = locale.id.language.as_str();
    match language.len() {
        2 | 3 if language != "und" => Some(language.to_string()),
        _ => None,
    }
}
