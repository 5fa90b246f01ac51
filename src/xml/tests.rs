//! Tests for the lossless XML model.

use super::*;

fn round_trip(source: &str) {
    let document = XmlDocument::parse(source).unwrap();
    assert_eq!(document.to_xml_string(), source);
}

#[test]
fn test_round_trip_is_byte_identical() {
    round_trip(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!-- leading comment -->
<configuration>
  <packageSources>
    <clear/>
    <add key="a"   value='https://a'
         protocolVersion="3"  />
  </packageSources>
  <config><![CDATA[ raw <stuff> ]]></config>
  <?custom instruction?>
</configuration>
<!-- trailing comment -->
"#,
    );
}

#[test]
fn test_round_trip_keeps_crlf_and_tabs() {
    round_trip("<configuration>\r\n\t<packageSources>\r\n\t\t<add key=\"a\" value=\"b\" />\r\n\t</packageSources>\r\n</configuration>\r\n");
}

#[test]
fn test_round_trip_keeps_entities_and_bom() {
    let source = "\u{feff}<configuration><add key=\"a&amp;b\" value=\"&quot;x&quot;\">t &lt; u</add></configuration>";
    let document = XmlDocument::parse(source).unwrap();
    assert!(document.has_bom());
    assert_eq!(document.to_xml_string(), source);

    let add = document.root().unwrap().find_child("add").unwrap();
    assert_eq!(add.attribute("key"), Some("a&b"));
    assert_eq!(add.attribute("value"), Some("\"x\""));
    assert_eq!(add.text_content(), "t < u");
}

#[test]
fn test_round_trip_keeps_doctype_and_open_close_form() {
    round_trip("<!DOCTYPE configuration>\n<configuration><packageSources></packageSources></configuration>");
}

#[test]
fn test_set_attribute_only_regenerates_changed_attribute() {
    let source = r#"<add  key='a'   value="old"	protocolVersion="3"/>"#;
    let mut document = XmlDocument::parse(source).unwrap();
    let add = document.root_mut().unwrap();

    add.set_attribute("key", "a");
    assert_eq!(document.to_xml_string(), source);

    let add = document.root_mut().unwrap();
    add.set_attribute("value", "new");
    assert_eq!(
        document.to_xml_string(),
        r#"<add  key='a' value="new"	protocolVersion="3"/>"#
    );
}

#[test]
fn test_set_attribute_appends_new_attribute() {
    let mut document = XmlDocument::parse(r#"<add key="a" />"#).unwrap();
    document.root_mut().unwrap().set_attribute("value", "x&y");
    assert_eq!(document.to_xml_string(), r#"<add key="a" value="x&amp;y" />"#);
}

#[test]
fn test_self_closing_element_gains_children() {
    let mut document = XmlDocument::parse("<packageSources />").unwrap();
    let root = document.root_mut().unwrap();
    root.children_mut()
        .push(XmlNode::Element(XmlElement::with_attributes(
            "add",
            &[("key", "a"), ("value", "b")],
        )));
    assert_eq!(
        document.to_xml_string(),
        r#"<packageSources><add key="a" value="b" /></packageSources>"#
    );
}

#[test]
fn test_new_element_serialization() {
    let element = XmlElement::with_attributes("package", &[("pattern", "Contoso.*")]);
    assert!(element.is_self_closing());
    assert_eq!(element.to_xml_string(), r#"<package pattern="Contoso.*" />"#);
}

#[test]
fn test_child_lookup() {
    let document = XmlDocument::parse(
        "<configuration>\n  <!-- c -->\n  <config />\n  <packageSources />\n</configuration>",
    )
    .unwrap();
    let root = document.root().unwrap();
    assert_eq!(root.child_elements().count(), 2);
    assert!(root.find_child("packageSources").is_some());
    assert_eq!(root.position_of_child("config"), Some(3));
    assert!(root.children()[1].is_comment());
    assert!(root.children()[0].is_whitespace());
}

#[test]
fn test_unclosed_element_is_rejected() {
    let err = XmlDocument::parse("<configuration><packageSources>").unwrap_err();
    assert!(matches!(
        err,
        XmlError::UnclosedElement(_) | XmlError::Syntax { .. }
    ));
}

#[test]
fn test_mismatched_end_tag_is_rejected() {
    let err = XmlDocument::parse("<configuration></packageSources>").unwrap_err();
    assert!(matches!(err, XmlError::Syntax { .. }));
}

#[test]
fn test_structure_errors() {
    assert_eq!(
        XmlDocument::parse("<!-- only a comment -->").unwrap_err(),
        XmlError::EmptyDocument
    );
    assert_eq!(
        XmlDocument::parse("<a/><b/>").unwrap_err(),
        XmlError::MultipleRoots("b".into())
    );
    assert!(matches!(
        XmlDocument::parse("not xml").unwrap_err(),
        XmlError::InvalidStructure(_)
    ));
}
