//! URL-safe slugs for filter option names.

use regex::Regex;
use std::sync::LazyLock;

static UPPER_RUN_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,})([0-9]+)").unwrap());
static LOWER_UPPER_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9]+)([A-Z]{2,})").unwrap());
static LOWER_UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
// `s` is excluded so plural acronyms ("NGOs") stay whole.
static UPPER_RUN_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-rt-z0-9]+)").unwrap());
static CONTRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9]+)'([ts])(\s|$)").unwrap());

/// Lowercase, hyphen-separated slug of a display name.
///
/// `"United States"` becomes `"united-states"`, `"Côte d'Ivoire"` becomes
/// `"cote-d-ivoire"`. Letters outside the Latin table are kept as-is.
pub fn slugify(name: &str) -> String {
    let replaced = name.replace('&', " and ");
    let folded = transliterate(&replaced);
    let split = decamelize(&folded);
    let contracted = CONTRACTION_RE.replace_all(&split, "${1}${2}${3}");

    let mut slug = String::with_capacity(contracted.len());
    let mut pending_dash = false;
    for c in contracted.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn decamelize(text: &str) -> String {
    let text = UPPER_RUN_DIGITS_RE.replace_all(text, "${1} ${2}");
    let text = LOWER_UPPER_RUN_RE.replace_all(&text, "${1} ${2}");
    let text = LOWER_UPPER_RE.replace_all(&text, "${1} ${2}");
    UPPER_RUN_WORD_RE.replace_all(&text, "${1} ${2}").into_owned()
}

fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_latin(c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

fn fold_latin(c: char) -> Option<&'static str> {
    let ascii = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Č' | 'Ĉ' | 'Ċ' => "C",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'Ğ' | 'Ģ' | 'Ġ' => "G",
        'ğ' | 'ģ' | 'ġ' => "g",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'Ķ' => "K",
        'ķ' => "k",
        'Ł' | 'Ľ' | 'Ļ' | 'Ĺ' => "L",
        'ł' | 'ľ' | 'ļ' | 'ĺ' => "l",
        'Ñ' | 'Ń' | 'Ň' | 'Ņ' => "N",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ř' => "R",
        'ŕ' | 'ř' => "r",
        'Ś' | 'Š' | 'Ş' | 'Ș' => "S",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ß' => "ss",
        'Ť' | 'Ţ' | 'Ț' => "T",
        'ť' | 'ţ' | 'ț' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'Ý' | 'Ÿ' => "Y",
        'ý' | 'ÿ' => "y",
        'Ź' | 'Ž' | 'Ż' => "Z",
        'ź' | 'ž' | 'ż' => "z",
        '’' | '‘' => "'",
        _ => return None,
    };
    Some(ascii)
}
