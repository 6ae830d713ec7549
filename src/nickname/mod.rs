//! Nickname resolver (C5): converts a reference ARI's `namespace`/`name`
//! between symbolic text form and nickname (integer) form, consulting an
//! [`AdmCatalog`]. Grounded in `original_source/src/ace/nickname.py`.

mod error;

pub use error::NicknameError;

use crate::adm::{AdmCatalog, AdmChildRef};
use crate::ari::{Ac, Ari, Expr, Identity, Name, Namespace, Param, ReferenceAri, StructType, Tnvc};
use crate::diag::normalize_ident;

/// The conversion direction of a [`Converter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Symbolic (text) namespace/name to nickname (integer) form.
    ToNn,
    /// Nickname (integer) form back to symbolic (text) form.
    FromNn,
}

/// The object-kind enumeration of draft-birrane-dtn-amp-08, Table 1 — a
/// numbering distinct from [`StructType`] used only inside a nickname
/// namespace value (`adm.enum * 20 + AdmObjType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum AdmObjType {
    Const = 0,
    Ctrl = 1,
    Edd = 2,
    Mac = 3,
    Oper = 4,
    Rptt = 5,
    Sbr = 6,
    Tblt = 7,
    Tbr = 8,
    Var = 9,
    Mdat = 10,
}

impl AdmObjType {
    const ALL: &'static [AdmObjType] = &[
        AdmObjType::Const,
        AdmObjType::Ctrl,
        AdmObjType::Edd,
        AdmObjType::Mac,
        AdmObjType::Oper,
        AdmObjType::Rptt,
        AdmObjType::Sbr,
        AdmObjType::Tblt,
        AdmObjType::Tbr,
        AdmObjType::Var,
        AdmObjType::Mdat,
    ];

    pub fn from_i64(value: i64) -> Option<Self> {
        AdmObjType::ALL.iter().copied().find(|t| *t as i64 == value)
    }

    /// Maps a [`StructType`] object category to its Table 1 nickname type,
    /// by name (original: `AdmObjType[obj_type.name]`). `None` for the
    /// primitive/compound `StructType` categories, which have no ADM object
    /// kind of their own.
    pub fn from_struct_type(t: StructType) -> Option<Self> {
        match t {
            StructType::Const => Some(AdmObjType::Const),
            StructType::Ctrl => Some(AdmObjType::Ctrl),
            StructType::Edd => Some(AdmObjType::Edd),
            StructType::Mac => Some(AdmObjType::Mac),
            StructType::Oper => Some(AdmObjType::Oper),
            StructType::Rptt => Some(AdmObjType::Rptt),
            StructType::Sbr => Some(AdmObjType::Sbr),
            StructType::Tblt => Some(AdmObjType::Tblt),
            StructType::Tbr => Some(AdmObjType::Tbr),
            StructType::Var => Some(AdmObjType::Var),
            StructType::Mdat => Some(AdmObjType::Mdat),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AdmObjType::Const => "CONST",
            AdmObjType::Ctrl => "CTRL",
            AdmObjType::Edd => "EDD",
            AdmObjType::Mac => "MAC",
            AdmObjType::Oper => "OPER",
            AdmObjType::Rptt => "RPTT",
            AdmObjType::Sbr => "SBR",
            AdmObjType::Tblt => "TBLT",
            AdmObjType::Tbr => "TBR",
            AdmObjType::Var => "VAR",
            AdmObjType::Mdat => "MDAT",
        }
    }
}

/// Walks an ARI tree converting reference identities between symbolic and
/// nickname form (original: `nickname.Converter`).
pub struct Converter<'a> {
    mode: Mode,
    catalog: &'a AdmCatalog,
    must_nickname: bool,
}

impl<'a> Converter<'a> {
    pub fn new(mode: Mode, catalog: &'a AdmCatalog, must_nickname: bool) -> Self {
        Self {
            mode,
            catalog,
            must_nickname,
        }
    }

    /// Convert `ari` in place, recursing into any nested parameters.
    pub fn convert(&self, ari: &mut Ari) -> Result<(), NicknameError> {
        if let Ari::Reference(reference) = ari {
            self.convert_reference(reference)?;
        }
        Ok(())
    }

    fn convert_reference(&self, reference: &mut ReferenceAri) -> Result<(), NicknameError> {
        self.convert_identity(reference)?;
        if let Some(params) = &mut reference.params {
            for param in params {
                self.convert_param(param)?;
            }
        }
        Ok(())
    }

    fn convert_param(&self, param: &mut Param) -> Result<(), NicknameError> {
        match param {
            Param::Ari(ari) => self.convert(ari),
            Param::Ac(ac) => self.convert_ac(ac),
            Param::Expr(expr) => self.convert_expr(expr),
            Param::Tnvc(tnvc) => self.convert_tnvc(tnvc),
        }
    }

    fn convert_ac(&self, ac: &mut Ac) -> Result<(), NicknameError> {
        for item in &mut ac.items {
            self.convert_param(item)?;
        }
        Ok(())
    }

    fn convert_expr(&self, expr: &mut Expr) -> Result<(), NicknameError> {
        for item in &mut expr.items {
            self.convert_param(item)?;
        }
        Ok(())
    }

    fn convert_tnvc(&self, tnvc: &mut Tnvc) -> Result<(), NicknameError> {
        for item in &mut tnvc.items {
            self.convert_param(item)?;
        }
        Ok(())
    }

    fn convert_identity(&self, reference: &mut ReferenceAri) -> Result<(), NicknameError> {
        match self.mode {
            Mode::ToNn => self.convert_to_nn(reference),
            Mode::FromNn => self.convert_from_nn(reference),
        }
    }

    fn fail_or_skip(&self, message: String) -> Result<(), NicknameError> {
        if self.must_nickname {
            Err(NicknameError::new(message))
        } else {
            log::debug!("{message}, leaving in symbolic form");
            Ok(())
        }
    }

    fn convert_to_nn(&self, reference: &mut ReferenceAri) -> Result<(), NicknameError> {
        let Some(Namespace::Text(namespace_text)) = &reference.ident.namespace else {
            return Ok(());
        };
        let Some(adm_name) = namespace_text.splitn(2, ':').nth(1) else {
            return self.fail_or_skip(format!(
                "namespace \"{namespace_text}\" is not in \"AUTHORITY:adm_name\" form"
            ));
        };
        let Name::Text(obj_name) = &reference.ident.name else {
            return Ok(());
        };
        let obj_name_norm = normalize_ident(obj_name);
        let obj_type = reference.ident.type_enum;

        let Some(nn_type) = AdmObjType::from_struct_type(obj_type) else {
            return self.fail_or_skip(format!("type {obj_type} has no nickname object kind"));
        };

        let adm = match self.catalog.by_norm_name(adm_name) {
            Ok(adm) => adm,
            Err(_) => {
                return self.fail_or_skip(format!("the ADM named {adm_name} does not exist"))
            }
        };
        let Some(adm_enum) = adm.enum_value else {
            return self.fail_or_skip(format!("the ADM named {adm_name} does not have an enumeration"));
        };

        let obj = adm.get_child(obj_type, Some(obj_name_norm.as_str()), None);
        let obj = match obj {
            Some(obj) => obj,
            None => return self.fail_or_skip(format!("the ADM object named {obj_name} does not exist")),
        };
        let obj_enum = obj.enum_value();

        let parmspec = obj.parmspec().cloned();

        reference.ident.namespace = Some(Namespace::Nickname((adm_enum * 20 + nn_type as i64) as u64));
        let name_bytes = serde_cbor::to_vec(&obj_enum)
            .map_err(|e| NicknameError::new(format!("failed to encode object nickname: {e}")))?;
        reference.ident.name = Name::Bytes(name_bytes);

        if let Some(parmspec) = parmspec {
            if let Some(params) = &mut reference.params {
                for (ix, spec) in parmspec.items.iter().enumerate() {
                    if spec.type_name.eq_ignore_ascii_case("TNVC") {
                        if let Some(slot) = params.get_mut(ix) {
                            if let Param::Ac(ac) = slot {
                                *slot = Param::Tnvc(Tnvc {
                                    items: std::mem::take(&mut ac.items),
                                });
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn convert_from_nn(&self, reference: &mut ReferenceAri) -> Result<(), NicknameError> {
        let Some(Namespace::Nickname(namespace_nick)) = reference.ident.namespace else {
            return Ok(());
        };
        let namespace_nick = namespace_nick as i64;
        let adm_enum = namespace_nick.div_euclid(20);
        let kind_nick = namespace_nick.rem_euclid(20);

        let adm_type = AdmObjType::from_i64(kind_nick);
        match adm_type {
            Some(adm_type) if AdmObjType::from_struct_type(reference.ident.type_enum) == Some(adm_type) => {}
            Some(adm_type) => log::warn!(
                "nickname type {} is inconsistent with ARI type {}",
                adm_type.name(),
                reference.ident.type_enum
            ),
            None => log::warn!(
                "nickname type {kind_nick} does not match any known ADM object kind"
            ),
        }

        let Name::Bytes(name_bytes) = &reference.ident.name else {
            return Ok(());
        };
        let obj_enum: i64 = serde_cbor::from_slice(name_bytes)
            .map_err(|e| NicknameError::new(format!("object name is not an encoded integer: {e}")))?;

        let adm = self
            .catalog
            .by_enum(adm_enum)
            .map_err(|_| NicknameError::new(format!("no ADM found with enumeration {adm_enum}")))?;

        let obj_type = reference.ident.type_enum;
        let obj: AdmChildRef<'_> = adm.get_child(obj_type, None, Some(obj_enum)).ok_or_else(|| {
            NicknameError::new(format!(
                "ADM {} has no {obj_type} object with enumeration {obj_enum}",
                adm.norm_name
            ))
        })?;

        reference.ident.namespace = Some(Namespace::Text(format!("IANA:{}", adm.norm_name)));
        reference.ident.name = Name::Text(obj.norm_name().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adm::{AdmFile, Ctrl, Mdat};
    use crate::ari::{Identity, Literal};

    fn sample_catalog() -> AdmCatalog {
        let mut catalog = AdmCatalog::new();
        let adm = AdmFile {
            norm_name: "amp_agent".into(),
            norm_namespace: Some("iana:amp.agent".into()),
            adm_ns: Some("IANA:AMP.AGENT".into()),
            enum_value: Some(20),
            mdat: vec![
                Mdat {
                    name: "name".into(),
                    norm_name: "name".into(),
                    value: "amp_agent".into(),
                    ..Default::default()
                },
                Mdat {
                    name: "namespace".into(),
                    norm_name: "namespace".into(),
                    value: "IANA:AMP.AGENT".into(),
                    ..Default::default()
                },
                Mdat {
                    name: "enum".into(),
                    norm_name: "enum".into(),
                    value: "20".into(),
                    ..Default::default()
                },
            ],
            ctrl: vec![Ctrl {
                name: "reset".into(),
                norm_name: "reset".into(),
                description: None,
                parmspec: None,
                enum_value: 3,
            }],
            ..Default::default()
        };
        catalog.insert(adm, true).unwrap();
        catalog
    }

    fn reset_ari_symbolic() -> Ari {
        Ari::reference(
            Identity {
                namespace: Some(Namespace::Text("IANA:amp_agent".into())),
                type_enum: StructType::Ctrl,
                name: Name::Text("reset".into()),
                issuer: None,
                tag: None,
            },
            None,
        )
    }

    #[test]
    fn to_nn_converts_symbolic_ctrl_reference() {
        let catalog = sample_catalog();
        let converter = Converter::new(Mode::ToNn, &catalog, true);
        let mut ari = reset_ari_symbolic();
        converter.convert(&mut ari).unwrap();

        let Ari::Reference(r) = &ari else { panic!("expected reference") };
        assert_eq!(r.ident.namespace, Some(Namespace::Nickname(20 * 20 + 1)));
        assert_eq!(r.ident.name, Name::Bytes(serde_cbor::to_vec(&3i64).unwrap()));
    }

    #[test]
    fn from_nn_converts_nickname_ctrl_reference_back() {
        let catalog = sample_catalog();
        let converter = Converter::new(Mode::FromNn, &catalog, true);
        let mut ari = Ari::reference(
            Identity {
                namespace: Some(Namespace::Nickname(20 * 20 + 1)),
                type_enum: StructType::Ctrl,
                name: Name::Bytes(serde_cbor::to_vec(&3i64).unwrap()),
                issuer: None,
                tag: None,
            },
            None,
        );
        converter.convert(&mut ari).unwrap();

        let Ari::Reference(r) = &ari else { panic!("expected reference") };
        assert_eq!(r.ident.namespace, Some(Namespace::Text("IANA:amp_agent".into())));
        assert_eq!(r.ident.name, Name::Text("reset".into()));
    }

    #[test]
    fn must_nickname_fails_on_unknown_adm() {
        let catalog = AdmCatalog::new();
        let converter = Converter::new(Mode::ToNn, &catalog, true);
        let mut ari = reset_ari_symbolic();
        assert!(converter.convert(&mut ari).is_err());
    }

    #[test]
    fn without_must_nickname_unknown_adm_is_left_symbolic() {
        let catalog = AdmCatalog::new();
        let converter = Converter::new(Mode::ToNn, &catalog, false);
        let mut ari = reset_ari_symbolic();
        converter.convert(&mut ari).unwrap();
        assert_eq!(ari, reset_ari_symbolic());
    }

    #[test]
    fn literal_ari_is_left_untouched() {
        let catalog = sample_catalog();
        let converter = Converter::new(Mode::ToNn, &catalog, true);
        let mut ari = Ari::literal(StructType::Uint, Literal::Int(5));
        converter.convert(&mut ari).unwrap();
        assert_eq!(ari, Ari::literal(StructType::Uint, Literal::Int(5)));
    }
}
