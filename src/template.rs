// Values shipped in cfg.toml.example and the rules build.rs applies to cfg.toml.
// Shared with build.rs through #[path], keep it free of crate imports and alloc.

pub const WIFI_SSID_PLACEHOLDER: &str = "NOMBRE_DE_TU_WIFI";
pub const WIFI_PASSWORD_PLACEHOLDER: &str = "PASSWORD_DE_TU_WIFI";
pub const INGEST_URL_PLACEHOLDER: &str = "https://tu-url-ingest.run.app";
pub const STATUS_URL_PLACEHOLDER: &str = "https://tu-url-get-status.run.app";

/// One key of cfg.toml.
pub struct TemplateField {
    pub name: &'static str,
    /// Environment variable that replaces the file value at build time
    pub env_var: &'static str,
    pub placeholder: Option<&'static str>,
}

/// Keys in the order they appear in cfg.toml and `DeviceConfig`.
pub static FIELDS: [TemplateField; 5] = [
    TemplateField {
        name: "wifi_ssid",
        env_var: "S_PARKING_WIFI_SSID",
        placeholder: Some(WIFI_SSID_PLACEHOLDER),
    },
    TemplateField {
        name: "wifi_password",
        env_var: "S_PARKING_WIFI_PASSWORD",
        placeholder: Some(WIFI_PASSWORD_PLACEHOLDER),
    },
    TemplateField {
        name: "ingest_url",
        env_var: "S_PARKING_INGEST_URL",
        placeholder: Some(INGEST_URL_PLACEHOLDER),
    },
    TemplateField {
        name: "status_url",
        env_var: "S_PARKING_STATUS_URL",
        placeholder: Some(STATUS_URL_PLACEHOLDER),
    },
    // "A-01" in the template is a real spot id
    TemplateField {
        name: "spot_id",
        env_var: "S_PARKING_SPOT_ID",
        placeholder: None,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Filled,
    Empty,
    Placeholder,
}

impl Check {
    /// Empty values always stop the build, template values only with `strict-config`.
    pub fn fails_build(self, strict: bool) -> bool {
        match self {
            Check::Filled => false,
            Check::Empty => true,
            Check::Placeholder => strict,
        }
    }
}

/// An environment override, even an empty one, replaces the file value.
pub fn resolve<T>(from_file: T, from_env: Option<T>) -> T {
    from_env.unwrap_or(from_file)
}

pub fn check(field: &TemplateField, value: &str) -> Check {
    if value.trim().is_empty() {
        Check::Empty
    } else if field.placeholder == Some(value) {
        Check::Placeholder
    } else {
        Check::Filled
    }
}
