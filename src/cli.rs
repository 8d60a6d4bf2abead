//! CLI argument parsing.
//!
//! Every parameter arrives as a plain string; the subcommand itself is a
//! string too, so an unknown name is reported in the response envelope
//! rather than by the argument parser.
use crate::config::ConfigInputs;
use crate::dispatch::Params;
use crate::logging::LogSettings;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "devportal",
    version,
    about = "List, create and delete developer-portal resources, answering in a JSON envelope",
    after_help = "Subcommands:\n  list_dev_certs | list_dist_certs\n  list_profiles --profile-type <TYPE> --name <NAME>\n  create_profile --profile-type <TYPE> --bundle_id <ID> --certificate <ID> --profile_name <NAME>\n  delete_profile --id <ID>\n  get_app --bundle_id <ID> [--with-entitlements]\n  check_app_entitlements --bundle_id <ID> --entitlement <NAME>...\n  list_devices\n  register_devices --device <UDID=NAME>...\n\nExamples:\n  devportal --username me@example.com --password secret --subcommand list_dev_certs\n  devportal --subcommand delete_profile --id 8A2B3C"
)]
pub struct Args {
    /// Portal account name (falls back to DEVPORTAL_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Portal password (falls back to DEVPORTAL_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Operation to run
    #[arg(long)]
    pub subcommand: Option<String>,

    /// App bundle identifier for get_app, create_profile and check_app_entitlements
    #[arg(long = "bundle_id", value_name = "BUNDLE_ID")]
    pub bundle_id: Option<String>,

    /// Profile id for delete_profile
    #[arg(long)]
    pub id: Option<String>,

    /// Profile name to match for list_profiles
    #[arg(long)]
    pub name: Option<String>,

    /// Certificate id used when creating a profile
    #[arg(long)]
    pub certificate: Option<String>,

    /// Name given to the profile created by create_profile
    #[arg(long = "profile_name", value_name = "PROFILE_NAME")]
    pub profile_name: Option<String>,

    /// IOS_APP_DEVELOPMENT, IOS_APP_STORE, IOS_APP_ADHOC or IOS_APP_INHOUSE
    #[arg(long = "profile-type", alias = "profile_type", value_name = "PROFILE_TYPE")]
    pub profile_type: Option<String>,

    /// Device to register, as UDID=NAME (repeatable)
    #[arg(long = "device", value_name = "UDID=NAME")]
    pub devices: Vec<String>,

    /// Entitlement the app must have enabled (repeatable)
    #[arg(long = "entitlement", value_name = "NAME")]
    pub entitlements: Vec<String>,

    /// Include enabled portal features in get_app output
    #[arg(long)]
    pub with_entitlements: bool,

    /// Portal API root (falls back to DEVPORTAL_URL)
    #[arg(long, value_name = "URL")]
    pub portal_url: Option<String>,

    /// Log per-item detail to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            verbose: self.verbose,
        }
    }

    pub fn config_inputs(&self) -> ConfigInputs<'_> {
        ConfigInputs {
            portal_url: self.portal_url.as_deref(),
            username: self.username.as_deref(),
            password: self.password.as_deref(),
        }
    }

    pub fn params(&self) -> Params {
        Params {
            bundle_id: self.bundle_id.clone(),
            id: self.id.clone(),
            name: self.name.clone(),
            certificate: self.certificate.clone(),
            profile_name: self.profile_name.clone(),
            profile_type: self.profile_type.clone(),
            devices: self.devices.clone(),
            entitlements: self.entitlements.clone(),
            with_entitlements: self.with_entitlements,
        }
    }
}
