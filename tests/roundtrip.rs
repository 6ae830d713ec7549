//! Cross-codec round trips: text, CBOR, and nickname conversion working
//! together over the same ARI trees.

use ari_toolkit::adm::{AdmCatalog, AdmFile, Ctrl, Edd, Mdat, TypeNameItem, TypeNameList};
use ari_toolkit::ari::{Ac, Ari, Identity, Literal, Name, Namespace, Param, StructType};
use ari_toolkit::nickname::{Converter, Mode};
use ari_toolkit::{cbor, text};

fn amp_agent_adm() -> AdmFile {
    AdmFile {
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
        edd: vec![Edd {
            name: "num_rpts".into(),
            norm_name: "num_rpts".into(),
            description: None,
            parmspec: Some(TypeNameList {
                items: vec![TypeNameItem {
                    type_name: "TNVC".into(),
                    name: "filter".into(),
                }],
            }),
            type_name: "UINT".into(),
            enum_value: 1,
        }],
        ..Default::default()
    }
}

fn catalog() -> AdmCatalog {
    let mut catalog = AdmCatalog::new();
    catalog.insert(amp_agent_adm(), true).unwrap();
    catalog
}

/// spec.md §8 scenario 1: a bare `VAST` literal round-trips through text
/// and CBOR unchanged.
#[test]
fn literal_round_trips_text_and_cbor() {
    let text_form = "VAST.10";
    let ari = text::decode(text_form).unwrap();
    assert_eq!(text::encode(&ari), text_form);

    let bytes = cbor::encode(&ari).unwrap();
    assert_eq!(bytes, vec![0x53, 0x0A]);
    let decoded = cbor::decode(&bytes).unwrap();
    assert_eq!(decoded, ari);
    assert_eq!(text::encode(&decoded), text_form);
}

/// A symbolic reference converts to nickname form and back to the same
/// tree (spec.md §8 scenario 3: ToNn then FromNn is the identity on
/// namespace/name).
#[test]
fn reference_round_trips_through_nickname_conversion() {
    let cat = catalog();

    let text_form = "ari:/IANA:amp_agent/CTRL.reset";
    let ari = text::decode(text_form).unwrap();

    let mut nn_form = ari.clone();
    Converter::new(Mode::ToNn, &cat, true)
        .convert(&mut nn_form)
        .unwrap();

    let Ari::Reference(r) = &nn_form else {
        panic!("expected reference")
    };
    assert_eq!(r.ident.namespace, Some(Namespace::Nickname(20 * 20 + 1)));
    assert!(matches!(r.ident.name, Name::Bytes(_)));

    // The nickname form round-trips through CBOR byte-for-byte.
    let bytes = cbor::encode(&nn_form).unwrap();
    let from_cbor = cbor::decode(&bytes).unwrap();
    assert_eq!(from_cbor, nn_form);

    let mut back = from_cbor;
    Converter::new(Mode::FromNn, &cat, true)
        .convert(&mut back)
        .unwrap();
    assert_eq!(back, ari);
}

/// spec.md §8 scenario 4: a reference whose parmspec declares a `TNVC`
/// parameter gets that parameter promoted from `AC` to `TNVC` on the way
/// to nickname form, and the promotion is stable under a second pass.
#[test]
fn tnvc_promotion_runs_once_and_is_idempotent() {
    let cat = catalog();
    let text_form = "ari:/IANA:amp_agent/EDD.num_rpts([VAST.1,VAST.2])";
    let mut ari = text::decode(text_form).unwrap();

    let converter = Converter::new(Mode::ToNn, &cat, true);
    converter.convert(&mut ari).unwrap();

    let Ari::Reference(r) = &ari else { panic!("expected reference") };
    let params = r.params.as_ref().unwrap();
    assert!(matches!(params[0], Param::Tnvc(_)));

    let mut twice = ari.clone();
    converter.convert(&mut twice).unwrap();
    assert_eq!(twice, ari);
}

/// A nested AC carrying a mix of literals and another reference survives
/// text -> CBOR -> text unchanged.
#[test]
fn nested_ac_round_trips() {
    let text_form = "ari:/ns/CTRL.do_it(VAST.1,[true,\"hi\"])";
    let ari = text::decode(text_form).unwrap();
    let bytes = cbor::encode(&ari).unwrap();
    let decoded = cbor::decode(&bytes).unwrap();
    assert_eq!(decoded, ari);
    assert_eq!(text::encode(&decoded), text_form);
}

/// Empty params (`()`) are distinct from no params at all, across both
/// codecs.
#[test]
fn empty_params_are_distinct_from_absent_params() {
    let with_empty = text::decode("ari:/ns/CTRL.noop()").unwrap();
    let without = text::decode("ari:/ns/CTRL.noop").unwrap();
    assert_ne!(with_empty, without);

    let bytes = cbor::encode(&with_empty).unwrap();
    assert_eq!(cbor::decode(&bytes).unwrap(), with_empty);

    let bytes = cbor::encode(&without).unwrap();
    assert_eq!(cbor::decode(&bytes).unwrap(), without);
}

/// A multi-line text stream recovers one ARI per logical line via
/// [`text::LineAccumulator`], even when a value is split across physical
/// lines.
#[test]
fn line_accumulator_recovers_split_values() {
    let mut acc = text::LineAccumulator::new();
    let mut results = Vec::new();

    for line in ["ari:/ns/CTRL.a", "ari:/ns/CTRL.b(VAST.1,", "VAST.2)"] {
        if let Some(r) = acc.push_line(line) {
            results.push(r.unwrap());
        }
    }
    assert!(acc.finish().is_none());
    assert_eq!(results.len(), 2);
    assert_eq!(text::encode(&results[0]), "ari:/ns/CTRL.a");
    assert_eq!(text::encode(&results[1]), "ari:/ns/CTRL.b(VAST.1,VAST.2)");
}

/// A byte-string literal decodes its `h'...'` hex form and round-trips
/// through CBOR when carried as a TNVC parameter, where BSTR literals are
/// encoded bare rather than through the top-level literal frame (spec.md
/// §4.2 "LiteralARIs of type BSTR are encoded without this framing").
#[test]
fn byte_string_literal_decodes_and_round_trips_as_a_parameter() {
    let ari = text::decode("h'deadbeef'").unwrap();
    assert_eq!(
        ari,
        Ari::literal(StructType::Bstr, Literal::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]))
    );

    let encoded = text::encode(&ari);
    assert_eq!(encoded, "h'deadbeef'");
    assert_eq!(text::decode(&encoded).unwrap(), ari);

    let reference = Ari::reference(
        Identity {
            namespace: None,
            type_enum: StructType::Var,
            name: Name::Text("x".into()),
            issuer: None,
            tag: None,
        },
        Some(vec![Param::Ari(ari)]),
    );
    let bytes = cbor::encode(&reference).unwrap();
    assert_eq!(cbor::decode(&bytes).unwrap(), reference);
}

/// An EXPR parameter nests correctly and preserves its result type
/// through both codecs.
#[test]
fn expr_param_round_trips() {
    let text_form = "ari:/ns/CTRL.calc((UINT)[VAST.1,VAST.2])";
    let ari = text::decode(text_form).unwrap();
    let bytes = cbor::encode(&ari).unwrap();
    let decoded = cbor::decode(&bytes).unwrap();
    assert_eq!(decoded, ari);
    assert_eq!(text::encode(&decoded), text_form);
}

/// `Identity.issuer`/`Identity.tag` are optional qualifiers and travel
/// through the CBOR codec when present.
#[test]
fn issuer_and_tag_round_trip() {
    let ari = Ari::reference(
        Identity {
            namespace: Some(Namespace::Text("ns".into())),
            type_enum: StructType::Var,
            name: Name::Text("x".into()),
            issuer: Some(vec![0x01, 0x02]),
            tag: Some(vec![0xAA]),
        },
        None,
    );
    let bytes = cbor::encode(&ari).unwrap();
    assert_eq!(cbor::decode(&bytes).unwrap(), ari);
}

#[test]
fn without_must_nickname_leaves_unresolvable_reference_symbolic() {
    let cat = AdmCatalog::new();
    let mut ari = text::decode("ari:/IANA:no_such_adm/CTRL.reset").unwrap();
    let before = ari.clone();
    Converter::new(Mode::ToNn, &cat, false)
        .convert(&mut ari)
        .unwrap();
    assert_eq!(ari, before);
}

#[test]
fn with_must_nickname_unresolvable_reference_errors() {
    let cat = AdmCatalog::new();
    let mut ari = text::decode("ari:/IANA:no_such_adm/CTRL.reset").unwrap();
    let result = Converter::new(Mode::ToNn, &cat, true).convert(&mut ari);
    assert!(result.is_err());
}

/// Nested AC items cannot exceed the CBOR 5-bit count header; this is a
/// documented limitation (spec.md §9), not a silent truncation.
#[test]
fn ac_beyond_max_count_is_rejected_at_encode_time() {
    let items: Vec<Param> = (0..32)
        .map(|i| Param::Ari(Ari::literal(StructType::Vast, Literal::Int(i))))
        .collect();
    let ari = Ari::reference(
        Identity {
            namespace: Some(Namespace::Text("ns".into())),
            type_enum: StructType::Ctrl,
            name: Name::Text("big".into()),
            issuer: None,
            tag: None,
        },
        Some(vec![Param::Ac(Ac { items })]),
    );
    assert!(cbor::encode(&ari).is_err());
}
