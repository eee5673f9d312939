//! Customer-facing text for the free wash campaign.

pub const PAGE_TITLE: &str = "Free Car Wash | Toot'n Totum Express Wash";
pub const HEADING: &str = "Discover Toot'n Totum Express Wash";
pub const INTRO: &str = "Enter your name and mobile number below, and we'll send you a code for a complimentary car wash at any of our locations.";

pub const FIRST_NAME_LABEL: &str = "First Name";
pub const LAST_NAME_LABEL: &str = "Last Name";
pub const PHONE_LABEL: &str = "Mobile Phone";

pub const CONSENT_DISCLOSURE: &str = "I agree to receive marketing communications and SMS messages. By submitting this form, I consent to receive promotional offers and updates. Message and data rates may apply. Message frequency varies. Reply HELP for help or STOP to cancel at any time.";

pub const SUBMIT_LABEL: &str = "Get My Free Wash Code";
pub const SUBMITTING_LABEL: &str = "Processing...";
pub const DELIVERY_NOTE: &str = "You'll receive your code via SMS within 1 minute!";

pub const ISSUED_HEADING: &str = "🎉 Congratulations! 🎉";
pub const ISSUED_LEAD: &str = "Your free car wash code is on its way!";
pub const ISSUED_BODY: &str = "Check your text messages for your unique code. Show this code to the car wash attendant at any of our 10 locations to enjoy your free wash!";
pub const ISSUED_FOOTNOTE: &str =
    "Haven't received your code? Please allow a few minutes for delivery.";

pub const WELCOME_BACK_HEADING: &str = "👋 Welcome Back! 👋";
pub const WELCOME_BACK_LEAD: &str =
    "It looks like you've already received a free wash code within the last 6 months.";
pub const WELCOME_BACK_BODY: &str = "We hope you enjoyed your free wash. Visit us for a wash anytime – we'd love to see you again!";
pub const WELCOME_BACK_FOOTNOTE: &str = "Thank you for being a valued customer!";
