//! Device — identity and product variant of a shadow-synced device.

use serde::{Deserialize, Serialize};

/// Product variants served by the Rest IoT adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Product {
    #[default]
    #[serde(rename = "riot")]
    Rest2ndGen,
    #[serde(rename = "riotPlus")]
    RestPlus2ndGen,
    #[serde(rename = "restoreIot")]
    RestoreIot,
}

/// Static facts about a product variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductTraits {
    pub product: Product,
    /// Human-readable model name.
    pub model: &'static str,
    /// Whether the device runs on a battery and reports `deviceInfo.fR`.
    pub battery: bool,
}

const PRODUCT_TRAITS: &[ProductTraits] = &[
    ProductTraits {
        product: Product::Rest2ndGen,
        model: "Rest 2nd Gen",
        battery: false,
    },
    ProductTraits {
        product: Product::RestPlus2ndGen,
        model: "Rest+ 2nd Gen",
        battery: true,
    },
    ProductTraits {
        product: Product::RestoreIot,
        model: "Restore IoT",
        battery: false,
    },
];

impl Product {
    /// Look up the static description of this variant.
    #[must_use]
    pub fn traits(self) -> &'static ProductTraits {
        PRODUCT_TRAITS
            .iter()
            .find(|traits| traits.product == self)
            .unwrap_or(&PRODUCT_TRAITS[0])
    }

    /// Model name shown to the user.
    #[must_use]
    pub fn model(self) -> &'static str {
        self.traits().model
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model())
    }
}

/// Identity of one device as registered with the cloud account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IotDeviceInfo {
    pub id: u64,
    pub name: String,
    pub mac_address: String,
    /// Shadow name the transport publishes updates to.
    pub thing_name: String,
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_model_per_variant() {
        assert_eq!(Product::Rest2ndGen.model(), "Rest 2nd Gen");
        assert_eq!(Product::RestPlus2ndGen.model(), "Rest+ 2nd Gen");
        assert_eq!(Product::RestoreIot.model(), "Restore IoT");
    }

    #[test]
    fn should_have_traits_for_every_variant() {
        for product in [
            Product::Rest2ndGen,
            Product::RestPlus2ndGen,
            Product::RestoreIot,
        ] {
            assert_eq!(product.traits().product, product);
        }
    }

    #[test]
    fn should_only_report_battery_for_rest_plus() {
        assert!(Product::RestPlus2ndGen.traits().battery);
        assert!(!Product::Rest2ndGen.traits().battery);
        assert!(!Product::RestoreIot.traits().battery);
    }

    #[test]
    fn should_deserialize_api_product_names() {
        let product: Product = serde_json::from_str("\"riotPlus\"").unwrap();
        assert_eq!(product, Product::RestPlus2ndGen);
        let product: Product = serde_json::from_str("\"restoreIot\"").unwrap();
        assert_eq!(product, Product::RestoreIot);
    }

    #[test]
    fn should_deserialize_device_info_with_defaults() {
        let info: IotDeviceInfo =
            serde_json::from_str(r#"{"name": "Nursery", "macAddress": "AA:BB"}"#).unwrap();
        assert_eq!(info.name, "Nursery");
        assert_eq!(info.mac_address, "AA:BB");
        assert_eq!(info.product, Product::Rest2ndGen);
    }
}
