/// Explicit session value passed down to whichever component needs it.
/// Nothing reads auth state ambiently; an unauthenticated session is how
/// the renderer learns it should watermark previews.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub vendor_id: String,
    pub authenticated: bool,
}

impl Session {
    /// Signed-in local vendor session
    pub fn local_vendor() -> Self {
        Self {
            vendor_id: "vendor::local".to_string(),
            authenticated: true,
        }
    }

    /// Read-only session for viewing someone else's receipt
    pub fn preview_only(vendor_id: &str) -> Self {
        Self {
            vendor_id: vendor_id.to_string(),
            authenticated: false,
        }
    }

    /// Previews under an unauthenticated session get the repeating
    /// watermark overlay; the exported artifact never does.
    pub fn preview_mode(&self) -> bool {
        !self.authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_mode_tracks_authentication() {
        assert!(!Session::local_vendor().preview_mode());
        assert!(Session::preview_only("vendor::other").preview_mode());
    }
}
