//! Shared key generation for storage backends.
//!
//! Key format: `{principal}/{area}/{uuid}.{ext}`. The principal always comes first so a
//! bucket policy or a directory listing can be scoped per user.

use facemark_core::{DetectedFormat, Principal};
use uuid::Uuid;

const ATTENDANCE_AREA: &str = "attendance";
const PROFILE_AREA: &str = "profile";

fn generate_key(principal: Principal, area: &str, format: DetectedFormat) -> String {
    format!(
        "{}/{}/{}.{}",
        principal,
        area,
        Uuid::new_v4(),
        format.extension()
    )
}

/// Key for a frame captured during an attendance submission.
pub fn attendance_frame_key(principal: Principal, format: DetectedFormat) -> String {
    generate_key(principal, ATTENDANCE_AREA, format)
}

/// Key for a photo appended to the principal's profile.
pub fn profile_photo_key(principal: Principal, format: DetectedFormat) -> String {
    generate_key(principal, PROFILE_AREA, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_principal() {
        let principal = Principal::new(Uuid::new_v4());
        let key = attendance_frame_key(principal, DetectedFormat::Jpeg);
        assert!(key.starts_with(&format!("{}/attendance/", principal)));
        assert!(key.ends_with(".jpg"));

        let key = profile_photo_key(principal, DetectedFormat::Webp);
        assert!(key.starts_with(&format!("{}/profile/", principal)));
        assert!(key.ends_with(".webp"));
    }

    #[test]
    fn keys_are_unique() {
        let principal = Principal::new(Uuid::new_v4());
        assert_ne!(
            attendance_frame_key(principal, DetectedFormat::Png),
            attendance_frame_key(principal, DetectedFormat::Png)
        );
    }
}
