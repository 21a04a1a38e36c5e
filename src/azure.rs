use k8s_openapi::api::core::v1::{CSIVolumeSource, EnvVar, Volume, VolumeMount};
use std::collections::BTreeMap;

use crate::{constants, utils};

const SECRETS_STORE_CSI_DRIVER: &str = "secrets-store.csi.k8s.io";
const SECRET_PROVIDER_CLASS_ATTRIBUTE: &str = "secretProviderClass";

/// Environment pointing the Azure SDK at the credentials file projected by the secret store
pub fn managed_identity_env_vars(credentials_file: &str) -> Vec<EnvVar> {
    vec![utils::env_var(
        constants::ENV_MANAGED_AZURE_CREDENTIALS_FILE_PATH,
        &format!("{}/{}", constants::MANAGED_AZURE_CERTIFICATE_PATH, credentials_file),
    )]
}

pub fn secret_store_volume_mount(volume_name: &str) -> VolumeMount {
    VolumeMount {
        name: volume_name.to_owned(),
        mount_path: constants::MANAGED_AZURE_CERTIFICATE_PATH.to_owned(),
        read_only: Some(true),
        ..VolumeMount::default()
    }
}

/// CSI volume backed by an externally provisioned `SecretProviderClass`
pub fn secret_store_volume(volume_name: &str, secret_provider_class: &str) -> Volume {
    Volume {
        name: volume_name.to_owned(),
        csi: Some(CSIVolumeSource {
            driver: SECRETS_STORE_CSI_DRIVER.to_owned(),
            read_only: Some(true),
            volume_attributes: Some(BTreeMap::from([(SECRET_PROVIDER_CLASS_ATTRIBUTE.to_owned(), secret_provider_class.to_owned())])),
            ..CSIVolumeSource::default()
        }),
        ..Volume::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_identity_env_vars() {
        let env_vars = managed_identity_env_vars("ingress.json");
        assert_eq!(env_vars, vec![utils::env_var("MANAGED_AZURE_HCP_CREDENTIALS_FILE_PATH", "/mnt/certs/ingress.json")]);
    }

    #[test]
    fn test_secret_store_volume() {
        let volume = secret_store_volume("ingress-cert", "managed-azure-ingress");
        let csi = volume.csi.unwrap();
        assert_eq!(csi.driver, "secrets-store.csi.k8s.io");
        assert_eq!(
            csi.volume_attributes.unwrap().get("secretProviderClass").map(String::as_str),
            Some("managed-azure-ingress")
        );
    }
}
