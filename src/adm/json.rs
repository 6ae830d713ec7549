//! ADM JSON CODEC, grounded in `original_source/src/ace/adm_json.py`. Keys
//! are case-folded on ingest (spec.md §4.3); this module consumes a generic
//! `serde_json::Value` rather than binding to a fixed schema struct, per
//! spec.md §1 treating the JSON parser as an external collaborator.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use super::{
    AdmError, AdmFile, AdmUses, Const, Ctrl, Edd, EmbeddedAc, EmbeddedAri, EmbeddedExpr,
    EmbeddedParam, Mac, Mdat, Oper, Rptt, Tblt, TypeNameItem, TypeNameList, Var,
};
use crate::diag::normalize_ident;

/// Case-fold every object key in a JSON value, recursively (original:
/// `Decoder._read_keys_insensitive`, applied by `json.load`'s
/// `object_pairs_hook` to every nested object).
fn casefold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.to_ascii_lowercase(), casefold_keys(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(casefold_keys).collect()),
        other => other,
    }
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, AdmError> {
    value
        .as_object()
        .ok_or_else(|| AdmError::new(format!("expected a JSON object for {context}")))
}

fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a Vec<Value>, AdmError> {
    value
        .as_array()
        .ok_or_else(|| AdmError::new(format!("expected a JSON array for {context}")))
}

fn get_str(obj: &Map<String, Value>, key: &str) -> Result<String, AdmError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AdmError::new(format!("missing or non-string \"{key}\"")))
}

fn get_opt_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn get_opt_value_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    // `value` fields may be any JSON scalar (a bare number, bool, or
    // string); stored as its canonical text form.
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn decode_type_name_list(value: &Value, context: &str) -> Result<TypeNameList, AdmError> {
    let items = as_array(value, context)?
        .iter()
        .map(|v| {
            let obj = as_object(v, context)?;
            Ok(TypeNameItem {
                type_name: get_str(obj, "type")?,
                name: get_str(obj, "name")?,
            })
        })
        .collect::<Result<Vec<_>, AdmError>>()?;
    Ok(TypeNameList { items })
}

fn decode_embedded_ari(value: &Value) -> Result<EmbeddedAri, AdmError> {
    let obj = as_object(value, "embedded ARI")?;
    let ap = match obj.get("ap") {
        None => None,
        Some(v) => Some(
            as_array(v, "ARI parameter list")?
                .iter()
                .map(|p| {
                    let p = as_object(p, "ARI parameter")?;
                    Ok(EmbeddedParam {
                        type_name: get_str(p, "type")?,
                        value: get_opt_value_str(p, "value").unwrap_or_default(),
                    })
                })
                .collect::<Result<Vec<_>, AdmError>>()?,
        ),
    };
    Ok(EmbeddedAri {
        ns: get_str(obj, "ns")?,
        nm: get_str(obj, "nm")?,
        ap,
    })
}

fn decode_embedded_ac(value: &Value, context: &str) -> Result<EmbeddedAc, AdmError> {
    let items = as_array(value, context)?
        .iter()
        .map(decode_embedded_ari)
        .collect::<Result<Vec<_>, AdmError>>()?;
    Ok(EmbeddedAc { items })
}

fn decode_embedded_expr(value: &Value) -> Result<EmbeddedExpr, AdmError> {
    let obj = as_object(value, "initializer")?;
    let postfix = obj
        .get("postfix-expr")
        .ok_or_else(|| AdmError::new("initializer missing \"postfix-expr\""))?;
    Ok(EmbeddedExpr {
        type_name: get_str(obj, "type")?,
        postfix: decode_embedded_ac(postfix, "initializer postfix-expr")?,
    })
}

macro_rules! decode_section {
    ($json_adm:expr, $key:literal, $decode_one:expr) => {{
        let mut out = Vec::new();
        if let Some(Value::Array(items)) = $json_adm.get($key) {
            for (enum_value, item) in items.iter().enumerate() {
                let obj = as_object(item, $key)?;
                let mut child = $decode_one(obj)?;
                child.enum_value = enum_value as i64;
                out.push(child);
            }
        }
        out
    }};
}

/// Decode a single ADM JSON document into an [`AdmFile`] (spec.md §4.3
/// "Ingest"; original: `adm_json.Decoder.decode`).
pub fn decode_adm(
    value: Value,
    abs_file_path: Option<PathBuf>,
    last_modified: Option<DateTime<Local>>,
) -> Result<AdmFile, AdmError> {
    let value = casefold_keys(value);
    let json_adm = as_object(&value, "ADM document")?;

    let uses = match json_adm.get("uses") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                let ns = v
                    .as_str()
                    .ok_or_else(|| AdmError::new("\"uses\" entries must be strings"))?
                    .to_string();
                Ok(AdmUses {
                    norm_namespace: normalize_ident(&ns),
                    namespace: ns,
                })
            })
            .collect::<Result<Vec<_>, AdmError>>()?,
        _ => Vec::new(),
    };

    let mdat = decode_section!(json_adm, "mdat", |obj: &Map<String, Value>| {
        Ok::<Mdat, AdmError>(Mdat {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            type_name: get_opt_str(obj, "type"),
            value: get_str(obj, "value")?,
            enum_value: 0,
        })
    });

    let const_ = decode_section!(json_adm, "const", |obj: &Map<String, Value>| {
        Ok::<Const, AdmError>(Const {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            type_name: get_opt_str(obj, "type"),
            value: get_opt_value_str(obj, "value"),
            enum_value: 0,
        })
    });

    let ctrl = decode_section!(json_adm, "ctrl", |obj: &Map<String, Value>| {
        Ok::<Ctrl, AdmError>(Ctrl {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            parmspec: obj
                .get("parmspec")
                .map(|v| decode_type_name_list(v, "Ctrl parmspec"))
                .transpose()?,
            enum_value: 0,
        })
    });

    let edd = decode_section!(json_adm, "edd", |obj: &Map<String, Value>| {
        Ok::<Edd, AdmError>(Edd {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            parmspec: obj
                .get("parmspec")
                .map(|v| decode_type_name_list(v, "Edd parmspec"))
                .transpose()?,
            type_name: get_str(obj, "type")?,
            enum_value: 0,
        })
    });

    let mac = decode_section!(json_adm, "mac", |obj: &Map<String, Value>| {
        let action = obj
            .get("action")
            .ok_or_else(|| AdmError::new("Mac object missing \"action\""))?;
        Ok::<Mac, AdmError>(Mac {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            parmspec: obj
                .get("parmspec")
                .map(|v| decode_type_name_list(v, "Mac parmspec"))
                .transpose()?,
            action: decode_embedded_ac(action, "Mac action")?,
            enum_value: 0,
        })
    });

    let oper = decode_section!(json_adm, "oper", |obj: &Map<String, Value>| {
        let in_type = match obj.get("in-type") {
            Some(v) => as_array(v, "Oper in-type")?
                .iter()
                .map(|t| {
                    t.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| AdmError::new("Oper in-type entries must be strings"))
                })
                .collect::<Result<Vec<_>, AdmError>>()?,
            None => Vec::new(),
        };
        Ok::<Oper, AdmError>(Oper {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            result_type: get_str(obj, "result-type")?,
            in_type,
            enum_value: 0,
        })
    });

    let rptt = decode_section!(json_adm, "rptt", |obj: &Map<String, Value>| {
        let definition = obj
            .get("definition")
            .ok_or_else(|| AdmError::new("Rptt object missing \"definition\""))?;
        Ok::<Rptt, AdmError>(Rptt {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            parmspec: obj
                .get("parmspec")
                .map(|v| decode_type_name_list(v, "Rptt parmspec"))
                .transpose()?,
            definition: decode_embedded_ac(definition, "Rptt definition")?,
            enum_value: 0,
        })
    });

    let tblt = decode_section!(json_adm, "tblt", |obj: &Map<String, Value>| {
        let columns = obj
            .get("columns")
            .ok_or_else(|| AdmError::new("Tblt object missing \"columns\""))?;
        Ok::<Tblt, AdmError>(Tblt {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            columns: decode_type_name_list(columns, "Tblt columns")?,
            enum_value: 0,
        })
    });

    let var = decode_section!(json_adm, "var", |obj: &Map<String, Value>| {
        Ok::<Var, AdmError>(Var {
            name: get_str(obj, "name")?,
            norm_name: normalize_ident(&get_str(obj, "name")?),
            description: get_opt_str(obj, "description"),
            type_name: get_str(obj, "type")?,
            initializer: obj.get("initializer").map(decode_embedded_expr).transpose()?,
            enum_value: 0,
        })
    });

    let mut adm = AdmFile {
        abs_file_path,
        last_modified,
        norm_name: String::new(),
        norm_namespace: None,
        adm_ns: None,
        enum_value: None,
        uses,
        mdat,
        const_,
        ctrl,
        edd,
        mac,
        oper,
        rptt,
        tblt,
        var,
    };
    adm.derive_identity();
    Ok(adm)
}

fn encode_type_name_list(list: &TypeNameList) -> Value {
    Value::Array(
        list.items
            .iter()
            .map(|item| {
                let mut obj = Map::new();
                obj.insert("type".into(), Value::String(item.type_name.clone()));
                obj.insert("name".into(), Value::String(item.name.clone()));
                Value::Object(obj)
            })
            .collect(),
    )
}

fn encode_embedded_ari(ari: &EmbeddedAri) -> Value {
    let mut obj = Map::new();
    obj.insert("ns".into(), Value::String(ari.ns.clone()));
    obj.insert("nm".into(), Value::String(ari.nm.clone()));
    if let Some(ap) = &ari.ap {
        obj.insert(
            "ap".into(),
            Value::Array(
                ap.iter()
                    .map(|p| {
                        let mut pobj = Map::new();
                        pobj.insert("type".into(), Value::String(p.type_name.clone()));
                        pobj.insert("value".into(), Value::String(p.value.clone()));
                        Value::Object(pobj)
                    })
                    .collect(),
            ),
        );
    }
    Value::Object(obj)
}

fn encode_embedded_ac(ac: &EmbeddedAc) -> Value {
    Value::Array(ac.items.iter().map(encode_embedded_ari).collect())
}

fn encode_embedded_expr(expr: &EmbeddedExpr) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), Value::String(expr.type_name.clone()));
    obj.insert("postfix-expr".into(), encode_embedded_ac(&expr.postfix));
    Value::Object(obj)
}

fn opt_str_value(v: &Option<String>) -> Option<Value> {
    v.as_ref().map(|s| Value::String(s.clone()))
}

/// Re-encode an [`AdmFile`] to its JSON form (spec.md §4.3 "Re-encode"):
/// only non-empty sections are emitted, insertion order is preserved, and
/// the per-child `enum` is elided (it is positional on decode).
pub fn encode_adm(adm: &AdmFile) -> Value {
    let mut out = Map::new();

    if !adm.uses.is_empty() {
        out.insert(
            "uses".into(),
            Value::Array(
                adm.uses
                    .iter()
                    .map(|u| Value::String(u.namespace.clone()))
                    .collect(),
            ),
        );
    }

    if !adm.mdat.is_empty() {
        out.insert(
            "Mdat".into(),
            Value::Array(
                adm.mdat
                    .iter()
                    .map(|m| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(m.name.clone()));
                        if let Some(d) = &m.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(t) = opt_str_value(&m.type_name) {
                            obj.insert("type".into(), t);
                        }
                        obj.insert("value".into(), Value::String(m.value.clone()));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.const_.is_empty() {
        out.insert(
            "Const".into(),
            Value::Array(
                adm.const_
                    .iter()
                    .map(|c| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(c.name.clone()));
                        if let Some(d) = &c.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(t) = opt_str_value(&c.type_name) {
                            obj.insert("type".into(), t);
                        }
                        if let Some(v) = opt_str_value(&c.value) {
                            obj.insert("value".into(), v);
                        }
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.ctrl.is_empty() {
        out.insert(
            "Ctrl".into(),
            Value::Array(
                adm.ctrl
                    .iter()
                    .map(|c| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(c.name.clone()));
                        if let Some(d) = &c.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(p) = &c.parmspec {
                            obj.insert("parmspec".into(), encode_type_name_list(p));
                        }
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.edd.is_empty() {
        out.insert(
            "Edd".into(),
            Value::Array(
                adm.edd
                    .iter()
                    .map(|e| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(e.name.clone()));
                        if let Some(d) = &e.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(p) = &e.parmspec {
                            obj.insert("parmspec".into(), encode_type_name_list(p));
                        }
                        obj.insert("type".into(), Value::String(e.type_name.clone()));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.mac.is_empty() {
        out.insert(
            "Mac".into(),
            Value::Array(
                adm.mac
                    .iter()
                    .map(|m| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(m.name.clone()));
                        if let Some(d) = &m.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(p) = &m.parmspec {
                            obj.insert("parmspec".into(), encode_type_name_list(p));
                        }
                        obj.insert("action".into(), encode_embedded_ac(&m.action));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.oper.is_empty() {
        out.insert(
            "Oper".into(),
            Value::Array(
                adm.oper
                    .iter()
                    .map(|o| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(o.name.clone()));
                        if let Some(d) = &o.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        obj.insert("result-type".into(), Value::String(o.result_type.clone()));
                        obj.insert(
                            "in-type".into(),
                            Value::Array(o.in_type.iter().map(|t| Value::String(t.clone())).collect()),
                        );
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.rptt.is_empty() {
        out.insert(
            "Rptt".into(),
            Value::Array(
                adm.rptt
                    .iter()
                    .map(|r| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(r.name.clone()));
                        if let Some(d) = &r.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        if let Some(p) = &r.parmspec {
                            obj.insert("parmspec".into(), encode_type_name_list(p));
                        }
                        obj.insert("definition".into(), encode_embedded_ac(&r.definition));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.tblt.is_empty() {
        out.insert(
            "Tblt".into(),
            Value::Array(
                adm.tblt
                    .iter()
                    .map(|t| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(t.name.clone()));
                        if let Some(d) = &t.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        obj.insert("columns".into(), encode_type_name_list(&t.columns));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    if !adm.var.is_empty() {
        out.insert(
            "Var".into(),
            Value::Array(
                adm.var
                    .iter()
                    .map(|v| {
                        let mut obj = Map::new();
                        obj.insert("name".into(), Value::String(v.name.clone()));
                        if let Some(d) = &v.description {
                            obj.insert("description".into(), Value::String(d.clone()));
                        }
                        obj.insert("type".into(), Value::String(v.type_name.clone()));
                        if let Some(init) = &v.initializer {
                            obj.insert("initializer".into(), encode_embedded_expr(init));
                        }
                        Value::Object(obj)
                    })
                    .collect(),
            ),
        );
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_case_insensitive_keys_and_derives_identity() {
        let doc = json!({
            "MDAT": [
                {"name": "name", "value": "amp_agent"},
                {"Name": "namespace", "value": "IANA:AMP.AGENT"},
                {"name": "enum", "value": "20"},
                {"name": "version", "value": "1.0"},
            ],
            "Rptt": [
                {"name": "full_report", "definition": []}
            ],
        });

        let adm = decode_adm(doc, None, None).unwrap();
        assert_eq!(adm.norm_name, "amp_agent");
        assert_eq!(adm.norm_namespace.as_deref(), Some("iana:amp.agent"));
        assert_eq!(adm.enum_value, Some(20));
        assert_eq!(adm.rptt.len(), 1);
        assert_eq!(adm.rptt[0].enum_value, 0);
    }

    #[test]
    fn uses_are_normalized() {
        let doc = json!({
            "uses": ["IANA:AMP.AGENT"],
            "Mdat": [{"name": "name", "value": "amp_core"}],
        });
        let adm = decode_adm(doc, None, None).unwrap();
        assert_eq!(adm.uses[0].norm_namespace, "iana:amp.agent");
    }

    #[test]
    fn encode_omits_empty_sections_and_enum() {
        let doc = json!({
            "Mdat": [{"name": "name", "value": "amp_agent"}],
        });
        let adm = decode_adm(doc, None, None).unwrap();
        let encoded = encode_adm(&adm);
        let obj = encoded.as_object().unwrap();
        assert!(obj.contains_key("Mdat"));
        assert!(!obj.contains_key("Ctrl"));
        let mdat0 = &obj["Mdat"][0];
        assert!(mdat0.as_object().unwrap().get("enum").is_none());
    }

    #[test]
    fn mac_action_round_trips_embedded_ari() {
        let doc = json!({
            "Mdat": [{"name": "name", "value": "amp_agent"}],
            "Mac": [{
                "name": "do_thing",
                "action": [{"ns": "amp_agent", "nm": "CTRL.reset"}],
            }],
        });
        let adm = decode_adm(doc, None, None).unwrap();
        assert_eq!(adm.mac[0].action.items[0].nm, "CTRL.reset");

        let encoded = encode_adm(&adm);
        let action = &encoded["Mac"][0]["action"][0];
        assert_eq!(action["nm"], "CTRL.reset");
    }
}
