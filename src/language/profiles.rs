//! Built-in language profiles
//!
//! Order must match `Language::all()`.

use super::{Language, LanguageProfile};

pub static PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        language: Language::English,
        name: "English",
        greetings: &["Hello", "Good day", "Hi there", "Welcome"],
        classifier_aliases: &["en", "eng", "eng_latn", "english"],
        voice_id: "eng",
        cloud_code: Some("en"),
        cloud_only: true,
    },
    LanguageProfile {
        language: Language::Afrikaans,
        name: "Afrikaans",
        greetings: &["Hallo", "Goeie dag", "Goeiemôre", "Welkom"],
        classifier_aliases: &["af", "afr", "afr_latn", "afrikaans"],
        voice_id: "afr",
        cloud_code: Some("af"),
        cloud_only: true,
    },
    LanguageProfile {
        language: Language::Zulu,
        name: "isiZulu",
        greetings: &["Sawubona", "Sanibonani", "Yebo", "Ngiyakwamukela"],
        classifier_aliases: &["zu", "zul", "zul_latn", "zulu", "isizulu"],
        voice_id: "zul",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Xhosa,
        name: "isiXhosa",
        greetings: &["Molo", "Molweni", "Wamkelekile"],
        classifier_aliases: &["xh", "xho", "xho_latn", "xhosa", "isixhosa"],
        voice_id: "xho",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Sepedi,
        name: "Sepedi",
        greetings: &["Thobela", "Dumela", "Le kae"],
        classifier_aliases: &["nso", "nso_latn", "sepedi", "northern sotho", "pedi"],
        voice_id: "nso",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Setswana,
        name: "Setswana",
        greetings: &["Dumelang", "O kae", "Re a go amogela"],
        classifier_aliases: &["tn", "tsn", "tsn_latn", "setswana", "tswana"],
        voice_id: "tsn",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Sesotho,
        name: "Sesotho",
        greetings: &["Lumela", "Lumelang", "O phela joang"],
        classifier_aliases: &["st", "sot", "sot_latn", "sesotho", "southern sotho", "sotho"],
        voice_id: "sot",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Xitsonga,
        name: "Xitsonga",
        greetings: &["Avuxeni", "Xewani", "Mi njhani"],
        classifier_aliases: &["ts", "tso", "tso_latn", "xitsonga", "tsonga"],
        voice_id: "tso",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Siswati,
        name: "siSwati",
        greetings: &["Sawubona", "Sanibonani", "Unjani"],
        classifier_aliases: &["ss", "ssw", "ssw_latn", "siswati", "swati", "swazi"],
        voice_id: "ssw",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Tshivenda,
        name: "Tshivenda",
        greetings: &["Ndaa", "Aa", "Ni hani"],
        classifier_aliases: &["ve", "ven", "ven_latn", "tshivenda", "venda"],
        voice_id: "ven",
        cloud_code: None,
        cloud_only: false,
    },
    LanguageProfile {
        language: Language::Ndebele,
        name: "isiNdebele",
        greetings: &["Lotjhani", "Salibonani", "Sikhulekile"],
        classifier_aliases: &["nr", "nbl", "nbl_latn", "isindebele", "ndebele", "southern ndebele"],
        voice_id: "nbl",
        cloud_code: None,
        cloud_only: false,
    },
];
