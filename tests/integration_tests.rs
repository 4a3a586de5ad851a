use keyvalues3::{
    from_reader, from_slice, from_slice_with_encoding, from_str, kv3, registry, to_string,
    to_vec, to_writer, Comment, Document, Encoding, Error, Flag, Flags, Format, KvMap, TextOptions,
    Value, WriteOptions,
};
use std::io::Cursor;

const NULL_DOCUMENT: &[u8] = b"VKV\x03\x00\x05\x86\x1b\xd8\xf7\xc1@\xad\x82u\xa4\x82g\xe7\x14|\x16\x12t\xe9\x06\x98F\xaf\xf2\xe6>\xb5\x907\xe7\x00\x00\x00\x00\x01\xFF\xFF\xFF\xFF";

const NPC_CONFIG: &str = r#"<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
{
	// per-difficulty tuning
	default =
	{
		reaction_time = 0.12
		health = 100
		model = resource:"models/npc/guard.vmdl"
		weapons = [ "pistol", "smg", ]
		spawn_flags = #[01 00 ff]
	}
	description = """
Guards patrol
the outer wall."""
}
"#;

fn binary(encoding: Encoding) -> WriteOptions {
    WriteOptions::new().with_encoding(encoding)
}

#[test]
fn test_null_document_binary_vector() {
    let bytes = to_vec(&Value::Null, &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    assert_eq!(bytes, NULL_DOCUMENT);

    let doc = from_slice(NULL_DOCUMENT).unwrap();
    assert!(doc.value.is_null());
    assert_eq!(doc.original_encoding, Some(Encoding::BINARY_UNCOMPRESSED));
    assert_eq!(doc.format, Format::GENERIC);
}

#[test]
fn test_single_key_binary_vector() {
    let bytes = to_vec(&kv3!({ "A": 1 }), &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let mut expected = NULL_DOCUMENT[..36].to_vec();
    expected.extend_from_slice(b"\x01\x00\x00\x00A\x00\x09\x01\x00\x00\x00\x00\x00\x00\x00\x10\xFF\xFF\xFF\xFF");
    assert_eq!(bytes, expected);

    let doc = from_slice(&bytes).unwrap();
    assert!(doc.value.deep_eq(&kv3!({ "A": 1 })));
}

#[test]
fn test_headerless_text_stays_headerless() {
    let doc = from_str("{ key = [1, 2, 3] }").unwrap();
    assert_eq!(doc.original_encoding, Some(Encoding::TEXT_HEADERLESS));
    assert_eq!(to_string(&doc).unwrap(), "{\n\tkey = [ 1, 2, 3 ]\n}\n");

    let bytes = to_vec(&doc, &WriteOptions::new()).unwrap();
    assert_eq!(bytes, b"{\n\tkey = [ 1, 2, 3 ]\n}\n");
}

#[test]
fn test_headered_text_round_trip() {
    let doc = from_str(NPC_CONFIG).unwrap();
    assert_eq!(doc.original_encoding, Some(Encoding::TEXT));

    let written = to_string(&doc).unwrap();
    assert!(written.starts_with("<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->\n"));

    let again = from_str(&written).unwrap();
    assert_eq!(again.original_encoding, doc.original_encoding);
    assert_eq!(again.format, doc.format);
    assert!(again.deep_eq(&doc));
}

#[test]
fn test_config_contents() {
    let doc = from_str(NPC_CONFIG).unwrap();
    let default = &doc.value["default"];
    assert_eq!(default["reaction_time"], 0.12);
    assert_eq!(default["health"], 100);
    assert!(default["model"].has_flag(&Flag::Resource));
    assert_eq!(default["model"], "models/npc/guard.vmdl");
    assert_eq!(default["weapons"].as_array().map(Vec::len), Some(2));
    assert_eq!(default["spawn_flags"].as_bytes(), Some(&[1u8, 0, 255][..]));
    assert_eq!(doc.value["description"], "Guards patrol\nthe outer wall.");
    assert!(doc.value["description"].has_flag(&Flag::MultilineString));
}

#[test]
fn test_text_to_lz4_and_back() {
    let doc = from_str(NPC_CONFIG).unwrap();
    let bytes = to_vec(&doc, &binary(Encoding::BINARY_LZ4)).unwrap();
    assert!(bytes.starts_with(b"VKV\x03"));

    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded.original_encoding, Some(Encoding::BINARY_LZ4));
    assert_eq!(decoded.value["default"]["reaction_time"], 0.12);
    assert!(decoded.value.deep_eq(&doc.value));
    assert!(decoded.comments.is_empty());
}

#[test]
fn test_lz4_and_uncompressed_agree() {
    let value = from_str(NPC_CONFIG).unwrap().value;
    let plain = to_vec(&value, &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let lz4 = to_vec(&value, &binary(Encoding::BINARY_LZ4)).unwrap();

    let a = from_slice(&plain).unwrap().value;
    let b = from_slice(&lz4).unwrap().value;
    assert!(a.deep_eq(&b));
}

#[test]
fn test_binary_preserves_integer_widths() {
    let value = Value::Array(vec![
        Value::Int32(-5),
        Value::UInt32(5),
        Value::Int64(i64::MIN),
        Value::UInt64(u64::MAX),
        Value::Double(-0.0),
        Value::Double(2.5),
        Value::from(""),
        Value::Blob(vec![]),
        Value::Object(KvMap::new()),
    ]);
    let bytes = to_vec(&value, &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let decoded = from_slice(&bytes).unwrap().value;
    assert!(decoded.deep_eq(&value));

    let items = decoded.as_array().unwrap();
    assert!(matches!(items[0], Value::Int32(-5)));
    assert!(matches!(items[3], Value::UInt64(u64::MAX)));
    assert!(matches!(items[4], Value::Double(d) if d.is_sign_negative()));
}

#[test]
fn test_binary_flags_round_trip() {
    let value = kv3!({
        "model": (resource: "a.vmdl"),
        "class": (subclass: "npc_guard")
    });
    let bytes = to_vec(&value, &binary(Encoding::BINARY_LZ4)).unwrap();
    let decoded = from_slice(&bytes).unwrap().value;
    assert!(decoded["model"].has_flag(&Flag::Resource));
    assert!(decoded["class"].has_flag(&Flag::SubClass));
    assert!(decoded.deep_eq(&value));
}

#[test]
fn test_binary_drops_flags_without_bits_and_comments() {
    let doc = from_str(
        r##"// squad roster
{
	// spawned first
	name = entity_name:"guard_01"
	title = localize:"#npc_guard"
	custom = vmap_only:7
	model = resource|entity_name:"a.vmdl"
}"##,
    )
    .unwrap();
    assert!(!doc.comments.is_empty());
    assert!(doc.value["name"].has_flag(&Flag::EntityName));

    let bytes = to_vec(&doc, &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let decoded = from_slice(&bytes).unwrap();

    assert!(decoded.comments.is_empty());
    assert!(decoded.value.as_object().unwrap().comments("name").is_empty());
    for key in ["name", "title", "custom"] {
        assert!(!decoded.value[key].is_flagged(), "{} kept a flag", key);
    }
    assert_eq!(decoded.value["model"].flags(), Flags::from(Flag::Resource));

    let expected = kv3!({
        "name": "guard_01",
        "title": "#npc_guard",
        "custom": 7,
        "model": (resource: "a.vmdl")
    });
    assert!(decoded.value.deep_eq(&expected));
}

#[test]
fn test_text_flags_round_trip() {
    let doc = from_str(r#"{ a = resource|subclass:"x" b = vmap_only:1 }"#).unwrap();
    let written = to_string(&doc).unwrap();
    assert_eq!(written, "{\n\ta = resource|subclass:\"x\"\n\tb = vmap_only:1\n}\n");
    assert!(from_str(&written).unwrap().deep_eq(&doc));
}

#[test]
fn test_unknown_binary_encoding_is_rejected() {
    let mut bytes = NULL_DOCUMENT.to_vec();
    bytes[4..20].copy_from_slice(&[0xAB; 16]);
    assert!(matches!(from_slice(&bytes), Err(Error::UnsupportedEncoding(_))));
}

#[test]
fn test_newer_binary_containers_are_rejected() {
    for magic in [b"\x01\x33VK", b"\x03\x33VK", b"\x05\x33VK"] {
        let mut bytes = magic.to_vec();
        bytes.extend_from_slice(&[0; 40]);
        assert!(matches!(from_slice(&bytes), Err(Error::UnsupportedEncoding(_))));
    }
}

#[test]
fn test_truncated_binary_is_corrupt() {
    for len in [5, 36, 40] {
        assert!(matches!(
            from_slice(&NULL_DOCUMENT[..len]),
            Err(Error::CorruptData(_))
        ));
    }
}

#[test]
fn test_unrecognized_input() {
    assert!(matches!(from_slice(b"\x89PNG"), Err(Error::UnrecognizedFormat(_))));
    assert!(matches!(from_slice(b"  hello"), Err(Error::UnrecognizedFormat(_))));
}

#[test]
fn test_trailing_commas_and_comments_are_ignored() {
    let plain = from_str(r#"{ "a" = 1 }"#).unwrap();
    let trailing = from_str(r#"{ "a" = 1, }"#).unwrap();
    let commented = from_str(r#"{ "a" = 1 /* c */ }"#).unwrap();
    assert!(plain.value.deep_eq(&trailing.value));
    assert!(plain.value.deep_eq(&commented.value));
}

#[test]
fn test_duplicate_keys_keep_last_value() {
    let doc = from_str("{ a = 1, b = 2, a = 3 }").unwrap();
    let keys: Vec<_> = doc.value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(doc.value["a"], 3);
}

#[test]
fn test_comments_survive_with_original_encoding() {
    let doc = from_str(NPC_CONFIG).unwrap();

    let without = String::from_utf8(to_vec(&doc, &WriteOptions::new()).unwrap()).unwrap();
    assert!(!without.contains("// per-difficulty tuning"));

    let options = WriteOptions::new().with_use_original_encoding(true);
    let with = String::from_utf8(to_vec(&doc, &options).unwrap()).unwrap();
    assert!(with.contains("\t// per-difficulty tuning\n\tdefault =\n"));

    let reread = from_str(&with).unwrap();
    assert_eq!(
        reread.value.as_object().unwrap().comments("default"),
        &[Comment::Line(" per-difficulty tuning".to_string())]
    );
}

#[test]
fn test_use_original_encoding_beats_explicit() {
    let doc = from_slice(NULL_DOCUMENT).unwrap();
    let options = WriteOptions::new()
        .with_encoding(Encoding::TEXT)
        .with_use_original_encoding(true);
    assert_eq!(to_vec(&doc, &options).unwrap(), NULL_DOCUMENT);

    let explicit = WriteOptions::new().with_encoding(Encoding::TEXT);
    let text = to_vec(&doc, &explicit).unwrap();
    assert!(text.starts_with(b"<!-- kv3 encoding:text:"));
    assert!(text.ends_with(b"-->\nnull\n"));
}

#[test]
fn test_bare_value_defaults_to_text_with_header() {
    let bytes = to_vec(&kv3!({ "a": 1 }), &WriteOptions::new()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d}"));

    let headerless = WriteOptions::new().with_text(TextOptions::new().with_header(false));
    assert_eq!(to_vec(&kv3!({ "a": 1 }), &headerless).unwrap(), b"{\n\ta = 1\n}\n");
}

#[test]
fn test_custom_format_round_trips_through_binary() {
    let format = Format::new("vpcf26", uuid::Uuid::from_u128(0x2628_8658)).unwrap();
    let doc = Document::new(kv3!({ "radius": 4.0 })).with_format(format.clone());

    let bytes = to_vec(&doc, &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded.format.version, format.version);

    let text = to_string(&decoded).unwrap();
    assert!(text.contains(&format!("version{{{}}}", format.version)));
}

#[test]
fn test_reader_and_writer() {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, &kv3!([1, 2]), &binary(Encoding::BINARY_LZ4)).unwrap();

    let doc = from_reader(Cursor::new(buffer)).unwrap();
    assert_eq!(doc.value[1], 2);
}

#[test]
fn test_hinted_read() {
    let bytes = to_vec(&kv3!("x"), &binary(Encoding::BINARY_UNCOMPRESSED)).unwrap();
    let doc = from_slice_with_encoding(&bytes, &Encoding::BINARY_UNCOMPRESSED).unwrap();
    assert_eq!(doc.value, "x");

    let text = from_slice_with_encoding(b"{}", &Encoding::TEXT).unwrap();
    assert!(text.value.is_object());
}

#[test]
fn test_registry_lookups() {
    let lz4 = registry::encoding_by_name("binarylz4").unwrap();
    assert_eq!(lz4.encoding, Encoding::BINARY_LZ4);
    assert!(matches!(
        registry::encoding_by_name("binary_other_newer"),
        Err(Error::UnknownEncoding(_))
    ));
    assert_eq!(
        registry::format_by_uuid(Format::GENERIC.version).unwrap(),
        &Format::GENERIC
    );
}

#[test]
fn test_parse_error_positions() {
    let err = from_str("{\n\ta = 1\n\tb = \n}").unwrap_err();
    assert_eq!(err.position().map(|p| p.line), Some(4));
    assert!(err.to_string().contains("line 4"));

    let err = from_str("{ a = \"open").unwrap_err();
    assert!(matches!(err, Error::Lex { .. }));
}

#[test]
fn test_string_escapes_round_trip() {
    let value = kv3!({ "path": "C:\\games\\\"quoted\"\ttab" });
    let doc = from_str(&to_string(&value).unwrap()).unwrap();
    assert!(doc.value.deep_eq(&value));
}
