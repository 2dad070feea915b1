use crate::i18n::Language;

/// All localized user-facing strings for a language
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Field Validation ====================
    /// Shown under a required field left empty
    pub field_required: &'static str,

    /// Shown under a malformed email field
    pub invalid_email: &'static str,

    /// Shown under a malformed phone field
    pub invalid_phone: &'static str,

    // ==================== Submission Banners ====================
    /// Banner after the message was accepted by the transport
    pub submit_success: &'static str,

    /// Banner when the session exceeded its submission allowance
    pub rate_limited: &'static str,

    /// Banner when the transport failed
    pub transport_failed: &'static str,

    /// Submit button label while the transport call is in flight
    pub sending: &'static str,

    /// Submit button label at rest
    pub send: &'static str,

    /// Returned when a second submission arrives while one is still sending
    pub submission_in_progress: &'static str,

    /// Returned when the session token is unknown or does not match
    pub invalid_session: &'static str,

    // ==================== News ====================
    /// Shown instead of the news grid when the content store is unreachable
    pub news_unavailable: &'static str,

    /// Link text at the bottom of each news card
    pub read_more: &'static str,

    // ==================== Page Meta ====================
    pub meta_description: &'static str,
    pub og_title: &'static str,
    pub og_description: &'static str,
}

impl LanguageStrings {
    /// Strings for the given language.
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        if language == Language::SINHALA {
            &SINHALA_STRINGS
        } else {
            &ENGLISH_STRINGS
        }
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    field_required: "This field is required",
    invalid_email: "Please enter a valid email address",
    invalid_phone: "Please enter a valid Sri Lankan phone number",

    submit_success: "Thank you! Your message has been sent successfully.",
    rate_limited: "Too many submissions. Please try again later.",
    transport_failed: "Sorry, there was an error sending your message. Please try again.",
    sending: "Sending...",
    send: "Send Message",
    submission_in_progress: "Your message is already being sent.",
    invalid_session: "Your session has expired. Please reload the page.",

    news_unavailable: "News is unavailable right now. Please try again later.",
    read_more: "Read more →",

    meta_description: "Bandarawela Dairy Producers Cooperative Society Ltd. - Ensuring guaranteed milk prices and quality dairy products since 1979.",
    og_title: "Bandarawela Dairy Producers Cooperative Society Ltd.",
    og_description: "Quality dairy products and guaranteed prices for farmers since 1979",
};

// ==================== Sinhala Strings ====================

pub const SINHALA_STRINGS: LanguageStrings = LanguageStrings {
    field_required: "මෙම ක්ෂේත්‍රය අවශ්‍ය වේ",
    invalid_email: "කරුණාකර වලංගු විද්‍යුත් තැපැල් ලිපිනයක් ඇතුළත් කරන්න",
    invalid_phone: "කරුණාකර වලංගු ශ්‍රී ලංකා දුරකථන අංකයක් ඇතුළත් කරන්න",

    submit_success: "ස්තූතියි! ඔබගේ පණිවිඩය සාර්ථකව යවන ලදී.",
    rate_limited: "බොහෝ ඉල්ලීම්. කරුණාකර පසුව නැවත උත්සාහ කරන්න.",
    transport_failed: "සමාවන්න, ඔබගේ පණිවිඩය යැවීමේදී දෝෂයක් ඇතිවිය. කරුණාකර නැවත උත්සාහ කරන්න.",
    sending: "යවමින්...",
    send: "පණිවිඩය යවන්න",
    submission_in_progress: "ඔබගේ පණිවිඩය දැනටමත් යවමින් පවතී.",
    invalid_session: "සැසිය කල් ඉකුත් වී ඇත. කරුණාකර පිටුව නැවත පූරණය කරන්න.",

    news_unavailable: "පුවත් මේ මොහොතේ ලබා ගත නොහැක. කරුණාකර පසුව නැවත උත්සාහ කරන්න.",
    read_more: "තව කියවන්න →",

    meta_description: "බණ්ඩාරවෙල කිරි නිෂ්පාදක සමුපකාර සංගමය - 1979 සිට සහතික කිරි මිල සහ ගුණාත්මක කිරි නිෂ්පාදන සහතික කිරීම.",
    og_title: "බණ්ඩාරවෙල කිරි නිෂ්පාදක සමුපකාර සංගමය",
    og_description: "1979 සිට ගොවීන්ට ගුණාත්මක කිරි නිෂ්පාදන සහ සහතික මිල",
};
