use std::{env, error::Error, fs, path::Path, path::PathBuf};

use serde::Deserialize;

#[path = "src/template.rs"]
mod template;

use template::{Check, FIELDS};

const CFG_FILE: &str = "cfg.toml";
const CFG_TEMPLATE: &str = "cfg.toml.example";
const CFG_PATH_VAR: &str = "S_PARKING_CFG";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    wifi_ssid: String,
    wifi_password: String,
    ingest_url: String,
    status_url: String,
    spot_id: String,
}

impl RawConfig {
    // Same order as template::FIELDS
    fn values_mut(&mut self) -> [&mut String; 5] {
        [
            &mut self.wifi_ssid,
            &mut self.wifi_password,
            &mut self.ingest_url,
            &mut self.status_url,
            &mut self.spot_id,
        ]
    }
}

fn config_path(manifest_dir: &Path) -> PathBuf {
    if let Ok(path) = env::var(CFG_PATH_VAR) {
        return manifest_dir.join(path);
    }

    let local = manifest_dir.join(CFG_FILE);
    if local.exists() {
        local
    } else {
        println!(
            "cargo:warning={} not found, building with {} values (set {} or touch {} once it exists)",
            CFG_FILE, CFG_TEMPLATE, CFG_PATH_VAR, CFG_TEMPLATE
        );
        manifest_dir.join(CFG_TEMPLATE)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let strict = env::var_os("CARGO_FEATURE_STRICT_CONFIG").is_some();

    // Tell Cargo to rerun if the toml in use or any override changes.
    // A missing file would count as always stale, so only existing files are watched.
    println!("cargo:rerun-if-changed={}", CFG_TEMPLATE);
    println!("cargo:rerun-if-changed=src/template.rs");
    println!("cargo:rerun-if-env-changed={}", CFG_PATH_VAR);

    // Read and parse
    let cfg_path = config_path(&manifest_dir);
    if cfg_path.exists() {
        println!("cargo:rerun-if-changed={}", cfg_path.display());
    }
    let toml_str = fs::read_to_string(&cfg_path)
        .map_err(|e| format!("cannot read {}: {}", cfg_path.display(), e))?;
    let mut raw: RawConfig = toml::from_str(&toml_str)
        .map_err(|e| format!("invalid {}: {}", cfg_path.display(), e))?;

    let mut placeholders = Vec::new();
    for (field, value) in FIELDS.iter().zip(raw.values_mut()) {
        println!("cargo:rerun-if-env-changed={}", field.env_var);
        *value = template::resolve(std::mem::take(value), env::var(field.env_var).ok());

        match template::check(field, value.as_str()) {
            Check::Empty => {
                return Err(format!("config field `{}` is empty", field.name).into());
            }
            Check::Placeholder => placeholders.push(field.name),
            Check::Filled => {}
        }
    }

    if !placeholders.is_empty() {
        let list = placeholders.join(", ");
        if Check::Placeholder.fails_build(strict) {
            return Err(format!("config fields still hold template values: {}", list).into());
        }
        println!("cargo:warning=config fields still hold template values: {}", list);
    }

    // Generate Rust code
    let code = format!(
        r#"
        pub const CONFIG: DeviceConfig = DeviceConfig {{
            wifi_ssid: {ssid:?},
            wifi_password: {psk:?},
            ingest_url: {ingest:?},
            status_url: {status:?},
            spot_id: {spot:?},
        }};
    "#,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_password,
        ingest = raw.ingest_url,
        status = raw.status_url,
        spot = raw.spot_id,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
