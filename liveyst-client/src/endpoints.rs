//! Backend route table

pub mod auth {
    pub const SEND_VERIFICATION_EMAIL: &str = "/auth/send-verification-email";
    pub const VERIFY_EMAIL_OTP: &str = "/auth/verify-email-otp";
    pub const OWNER_ONBOARD: &str = "/auth/owner/onboard";
}

pub mod s3 {
    pub const PUT_OBJECT_PRESIGNED_URL: &str = "/s3/putObjectPresignedUrl";
    pub const PUT_MULTIPLE_OBJECT_PRESIGNED_URL: &str = "/s3/putMultipleObjectPresignedUrl";
    pub const DELETE_OBJECT: &str = "/s3/deleteObject";
}

pub mod utils {
    pub const STATE: &str = "/utils/state";
    pub const CITY: &str = "/utils/city";
    pub const CATEGORY: &str = "/utils/category";
    pub const SERVICE: &str = "/utils/service";
    pub const SUGGEST_SERVICES: &str = "/utils/suggestServicesByCategory";
    pub const SUGGEST_PROFILE_BIO: &str = "/utils/suggestProfileBio";
    pub const SOCIAL_MEDIA: &str = "/utils/social-media";
}

pub mod store {
    pub const MAIN: &str = "/store";
    pub const MAIN_DETAIL: &str = "/store/main-detail";
    pub const CATEGORY_BIO: &str = "/store/category-bio";
    pub const FEEDBACK_UPI: &str = "/store/feedback-upi";
    pub const ADDRESS: &str = "/store/address";
    pub const SERVICE: &str = "/store/service";
    pub const LINK: &str = "/store/link";
    pub const PHOTO: &str = "/store/photo";
    pub const OWNER: &str = "/store/owner";
    pub const SECRET: &str = "/store/secret";
    pub const STATUS: &str = "/store/status";
}

/// `{base}/{id}`
pub fn with_id(base: &str, id: impl std::fmt::Display) -> String {
    format!("{base}/{id}")
}
