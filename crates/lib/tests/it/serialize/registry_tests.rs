//! Custom registry and serde bridge tests.

use std::sync::Arc;

use configtree::{
    ConfigOptions, ConfigTree,
    node::Scalar,
    path, serde_config_type,
    serialize::{
        ConfigType, MappingError, ScalarSerializer, SerdeSerializer, SerializerRegistry,
        TypeToken, coerce,
    },
};
use serde::{Deserialize, Serialize};

use crate::helpers::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Endpoint {
    host: String,
    port: u16,
    #[serde(default)]
    tls: bool,
}

serde_config_type!(Endpoint);

fn serde_options() -> ConfigOptions {
    let mut registry = SerializerRegistry::child(SerializerRegistry::defaults());
    registry.register_exact::<Endpoint>(SerdeSerializer::<Endpoint>::new());
    ConfigOptions::default().with_serializers(Arc::new(registry))
}

#[test]
fn test_unregistered_type_is_unresolved() {
    let tree = server_config();
    let err = tree.node("limits").get_as::<Endpoint>().unwrap_err();
    assert!(err.is_unresolved());
}

#[test]
fn test_serde_types_through_child_registry() {
    let mut tree = ConfigTree::with_options(serde_options());
    let endpoint = Endpoint {
        host: "db.internal".into(),
        port: 5432,
        tls: true,
    };
    tree.node_mut(path!["database", "primary"])
        .set_as(endpoint.clone())
        .unwrap();
    assert_eq!(
        to_json(&tree),
        r#"{"database":{"primary":{"host":"db.internal","port":5432,"tls":true}}}"#
    );
    assert_eq!(
        tree.node(path!["database", "primary"]).get_as::<Endpoint>().unwrap(),
        endpoint
    );

    // Defaults stay reachable through the parent.
    assert_eq!(
        tree.node(path!["database", "primary", "port"]).get_as::<u16>().unwrap(),
        5432
    );
}

#[test]
fn test_serde_types_inside_collections() {
    let mut tree = ConfigTree::with_options(serde_options());
    tree.root_mut()
        .set_value(configtree::Value::from(serde_json::json!({
            "replicas": [
                {"host": "a", "port": 1},
                {"host": "b", "port": 2, "tls": true}
            ]
        })))
        .unwrap();
    let replicas: Vec<Endpoint> = tree.node("replicas").get_as().unwrap();
    assert_eq!(replicas.len(), 2);
    assert!(!replicas[0].tls);
    assert!(replicas[1].tls);
}

#[test]
fn test_serde_errors_are_reported() {
    let mut tree = ConfigTree::with_options(serde_options());
    tree.node_mut(path!["endpoint", "host"]).set_value("a").unwrap();
    let err = tree.node("endpoint").get_as::<Endpoint>().unwrap_err();
    assert!(matches!(err, MappingError::Custom { .. }));
    assert!(err.to_string().contains("port"));
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Percent(u8);

impl ConfigType for Percent {
    fn type_token() -> TypeToken {
        TypeToken::of::<Percent>()
    }

    fn from_dyn(value: configtree::serialize::DynValue) -> Option<Self> {
        value.downcast::<Percent>().ok().map(|boxed| *boxed)
    }

    fn into_dyn(self) -> Option<configtree::serialize::DynValue> {
        Some(Box::new(self))
    }
}

struct PercentSerializer;

impl ScalarSerializer for PercentSerializer {
    fn deserialize_scalar(
        &self,
        _ty: &TypeToken,
        scalar: &Scalar,
    ) -> Result<configtree::serialize::DynValue, configtree::serialize::CoercionError> {
        let text = scalar.to_string();
        let value: u8 = match text.strip_suffix('%') {
            Some(number) => coerce::to_integer(&Scalar::Text(number.to_string()))?,
            None => coerce::to_integer(scalar)?,
        };
        Ok(Box::new(Percent(value.min(100))))
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &configtree::serialize::DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<Percent>()
            .map(|Percent(p)| Scalar::Text(format!("{p}%")))
    }
}

#[test]
fn test_custom_scalar_serializer() {
    let mut registry = SerializerRegistry::with_defaults();
    registry.register_scalar::<Percent>(PercentSerializer);
    let options = ConfigOptions::default().with_serializers(Arc::new(registry));

    let mut tree = ConfigTree::with_options(options);
    tree.node_mut("ratio").set_value("75%").unwrap();
    assert_eq!(tree.node("ratio").get_as::<Percent>().unwrap(), Percent(75));

    tree.node_mut("ratio").set_as(Percent(40)).unwrap();
    assert_eq!(tree.node("ratio").get_string().as_deref(), Some("40%"));
    assert_eq!(
        tree.node("ratio").get_as::<Option<Percent>>().unwrap(),
        Some(Percent(40))
    );
}
