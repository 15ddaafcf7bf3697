//! Document-level tables that move under `components`.

use serde_json::Value;

use specgen_shared::{Result, SpecgenError};

use crate::operation::{convert_parameter, convert_response};
use crate::{DEFAULT_MEDIA_TYPE, Object, expect_object};

/// Move `definitions`, `parameters`, `responses` and `securityDefinitions`
/// into `components`, merging with any `components` already present.
pub(crate) fn relocate(map: &mut Object, global_produces: &[String]) -> Result<()> {
    let mut components = match map.remove("components") {
        None => Object::new(),
        Some(Value::Object(existing)) => existing,
        Some(_) => return Err(SpecgenError::conversion("`components` must be an object")),
    };

    if let Some(definitions) = map.remove("definitions") {
        components.insert("schemas".into(), definitions);
    }

    if let Some(mut parameters) = map.remove("parameters") {
        for (name, param) in expect_object(&mut parameters, "`parameters`")?.iter_mut() {
            convert_parameter(expect_object(param, &format!("parameter `{name}`"))?);
        }
        components.insert("parameters".into(), parameters);
    }

    if let Some(mut responses) = map.remove("responses") {
        let produces = if global_produces.is_empty() {
            vec![DEFAULT_MEDIA_TYPE.to_string()]
        } else {
            global_produces.to_vec()
        };
        for (name, response) in expect_object(&mut responses, "`responses`")?.iter_mut() {
            convert_response(
                expect_object(response, &format!("response `{name}`"))?,
                &produces,
            )?;
        }
        components.insert("responses".into(), responses);
    }

    if let Some(mut schemes) = map.remove("securityDefinitions") {
        for (name, scheme) in expect_object(&mut schemes, "`securityDefinitions`")?.iter_mut() {
            convert_security_scheme(expect_object(
                scheme,
                &format!("security definition `{name}`"),
            )?);
        }
        components.insert("securitySchemes".into(), schemes);
    }

    if !components.is_empty() {
        map.insert("components".into(), Value::Object(components));
    }
    Ok(())
}

/// Reshape a security definition into a security scheme.
///
/// `basic` becomes `http` + `scheme: basic`; `oauth2` moves its single flow
/// under `flows`; `apiKey` is already in the current form.
fn convert_security_scheme(scheme: &mut Object) {
    match scheme.get("type").and_then(Value::as_str) {
        Some("basic") => {
            scheme.insert("type".into(), Value::String("http".into()));
            scheme.insert("scheme".into(), Value::String("basic".into()));
        }
        Some("oauth2") => {
            let flow_name = match scheme.remove("flow").as_ref().and_then(Value::as_str) {
                Some("implicit") => "implicit",
                Some("password") => "password",
                Some("application") => "clientCredentials",
                Some("accessCode") => "authorizationCode",
                _ => return,
            };

            let mut flow = Object::new();
            for key in ["authorizationUrl", "tokenUrl"] {
                if let Some(url) = scheme.remove(key) {
                    flow.insert(key.into(), url);
                }
            }
            let scopes = scheme
                .remove("scopes")
                .unwrap_or_else(|| Value::Object(Object::new()));
            flow.insert("scopes".into(), scopes);

            let mut flows = Object::new();
            flows.insert(flow_name.into(), Value::Object(flow));
            scheme.insert("flows".into(), Value::Object(flows));
        }
        _ => {}
    }
}
