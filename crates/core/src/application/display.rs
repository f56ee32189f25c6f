// Display-safe formatting for consoles that cannot render non-ASCII glyphs

/// Host platform family, as far as console rendering is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Unix,
    Other,
}

impl PlatformFamily {
    /// Family of the platform this binary was built for
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => PlatformFamily::Windows,
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris"
            | "illumos" | "android" | "ios" => PlatformFamily::Unix,
            _ => PlatformFamily::Other,
        }
    }

    /// Whether the default console encoding drops emoji and other non-ASCII text
    pub fn has_restricted_console(self) -> bool {
        self == PlatformFamily::Windows
    }
}

/// Make `text` safe to print on the current platform's console
pub fn display_safe(text: &str) -> String {
    display_safe_for(text, PlatformFamily::current())
}

/// Strip non-ASCII characters on restricted consoles; pass through otherwise
pub fn display_safe_for(text: &str, family: PlatformFamily) -> String {
    if family.has_restricted_console() {
        text.chars().filter(char::is_ascii).collect()
    } else {
        text.to_string()
    }
}
