/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Generic wire encoder: nested structure → namespace-qualified XML.
//!
//! Plugins that do not hand-roll their own markup build a [`WireValue`] tree
//! and hand it to [`encode`].  The tree is deliberately close to what a
//! RFC 7951 JSON emission of the schema would look like: ordered maps, typed
//! scalars, module-qualified keys (`"ietf-interfaces:interfaces"`).
//!
//! Encoding rules:
//! * `module:tag` keys resolve `module` through [`namespaces`]; a hit puts a
//!   default-namespace declaration on the opening tag, the closing tag stays
//!   bare.  Unknown prefixes are stripped; keys without a colon pass through.
//! * Sequence-valued keys re-emit as repeated sibling elements of the
//!   singular tag — except entry-denoting keys (`gate-control-entry`) whose
//!   array elements each already describe one entry and must not be
//!   double-wrapped.
//! * Strings are escaped for `&`, `<`, `>`; floats with integral values are
//!   rendered without a decimal point; `Null` emits an explicit `<nil/>`
//!   marker; non-finite numbers emit a loud `<unsupported .../>` diagnostic
//!   instead of being silently dropped.
//!
//! The encoder preserves structure-traversal order.  Callers that need a
//! canonical entry order (sorted by index) must sort while building the tree.

pub mod namespaces;

use std::fmt::Write;

// ── WireValue ─────────────────────────────────────────────────────────────────

/// One node of a mapped wire tree.
///
/// `Map` keeps insertion order — traversal order is emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Map(Vec<(String, WireValue)>),
    Seq(Vec<WireValue>),
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl WireValue {
    pub fn str(s: impl Into<String>) -> Self {
        WireValue::Str(s.into())
    }

    /// Unsigned integers up to 2^53 are exactly representable; schema leaf
    /// ranges (seconds, nanoseconds, intervals) stay far below that.
    pub fn uint(v: u64) -> Self {
        WireValue::Num(v as f64)
    }

    pub fn map<K: Into<String>>(pairs: Vec<(K, WireValue)>) -> Self {
        WireValue::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn seq(items: Vec<WireValue>) -> Self {
        WireValue::Seq(items)
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self,
            WireValue::Str(_) | WireValue::Num(_) | WireValue::Bool(_)
        )
    }
}

// ── Encoder ───────────────────────────────────────────────────────────────────

/// Keys whose array elements each denote one entry already; their items are
/// emitted directly instead of being wrapped a second time.
const ENTRY_ITEM_KEYS: &[&str] = &["gate-control-entry"];

/// Serializes a wire tree to an indented XML fragment.
pub fn encode(value: &WireValue) -> String {
    let mut buf = String::new();
    encode_into(value, &mut buf, 0);
    buf
}

fn encode_into(value: &WireValue, buf: &mut String, indent: usize) {
    match value {
        WireValue::Map(pairs) => {
            // A map carrying both "index" and "operation-name" is one
            // gate-control-entry; emit it with the fixed child order the
            // schema expects.
            if is_gate_control_entry(pairs) {
                write_gate_control_entry(pairs, buf, indent);
                return;
            }

            for (key, val) in pairs {
                let (tag, ns) = namespaces::split_qualified(key);

                match val {
                    WireValue::Seq(items) if ENTRY_ITEM_KEYS.contains(&tag) => {
                        for item in items {
                            encode_into(item, buf, indent);
                        }
                    }
                    WireValue::Seq(items) => {
                        // Repeat the tag per array element.
                        for item in items {
                            write_open(buf, tag, ns, indent);
                            encode_into(item, buf, indent + 1);
                            write_close(buf, tag, indent);
                        }
                    }
                    scalar if scalar.is_scalar() => {
                        write_element(buf, tag, ns, scalar, indent);
                    }
                    nested => {
                        write_open(buf, tag, ns, indent);
                        encode_into(nested, buf, indent + 1);
                        write_close(buf, tag, indent);
                    }
                }
            }
        }

        WireValue::Seq(items) => {
            for item in items {
                encode_into(item, buf, indent);
            }
        }

        // Scalar at the top level (rare)
        scalar if scalar.is_scalar() => write_element(buf, "value", None, scalar, indent),

        WireValue::Null => {
            write_indent(buf, indent);
            buf.push_str("<nil/>\n");
        }

        _ => unreachable!("scalar arms above are exhaustive"),
    }
}

fn is_gate_control_entry(pairs: &[(String, WireValue)]) -> bool {
    let has = |k: &str| pairs.iter().any(|(key, _)| key == k);
    has("index") && has("operation-name")
}

fn write_gate_control_entry(pairs: &[(String, WireValue)], buf: &mut String, indent: usize) {
    let get = |k: &str| pairs.iter().find(|(key, _)| key == k).map(|(_, v)| v);

    write_indent(buf, indent);
    buf.push_str("<gate-control-entry>\n");

    if let Some(v) = get("index") {
        write_element(buf, "index", None, v, indent + 1);
    }

    if let Some(WireValue::Str(op)) = get("operation-name") {
        // Identity values arrive module-qualified ("ieee802-dot1q-types:
        // set-gate-states"); the wire leaf takes the bare identity name.
        let bare = op.split_once(':').map_or(op.as_str(), |(_, rest)| rest);
        write_element(buf, "operation-name", None, &WireValue::str(bare), indent + 1);
    }

    if let Some(v) = get("time-interval-value") {
        write_element(buf, "time-interval-value", None, v, indent + 1);
    }
    if let Some(v) = get("gate-states-value") {
        write_element(buf, "gate-states-value", None, v, indent + 1);
    }

    write_indent(buf, indent);
    buf.push_str("</gate-control-entry>\n");
}

fn write_open(buf: &mut String, tag: &str, ns: Option<&str>, indent: usize) {
    write_indent(buf, indent);
    match ns {
        Some(uri) => {
            let _ = write!(buf, "<{} xmlns=\"{}\">\n", tag, uri);
        }
        None => {
            let _ = write!(buf, "<{}>\n", tag);
        }
    }
}

fn write_close(buf: &mut String, tag: &str, indent: usize) {
    write_indent(buf, indent);
    let _ = write!(buf, "</{}>\n", tag);
}

/// One scalar element on a single line.
fn write_element(buf: &mut String, tag: &str, ns: Option<&str>, value: &WireValue, indent: usize) {
    // Non-finite numbers cannot be rendered canonically; fail loudly with a
    // diagnostic marker instead of emitting garbage the device would reject
    // with a less helpful message.
    if let WireValue::Num(v) = value {
        if !v.is_finite() {
            write_indent(buf, indent);
            let _ = write!(buf, "<unsupported tag=\"{}\" kind=\"non-finite-number\"/>\n", tag);
            return;
        }
    }

    write_indent(buf, indent);
    match ns {
        Some(uri) => {
            let _ = write!(buf, "<{} xmlns=\"{}\">", tag, uri);
        }
        None => {
            let _ = write!(buf, "<{}>", tag);
        }
    }

    match value {
        WireValue::Str(s) => buf.push_str(&xml_escape(s)),
        WireValue::Num(v) => {
            // Integral floats render without a decimal point.
            if *v == ((*v as i64) as f64) {
                let _ = write!(buf, "{}", *v as i64);
            } else {
                let _ = write!(buf, "{}", v);
            }
        }
        WireValue::Bool(b) => {
            let _ = write!(buf, "{}", b);
        }
        _ => {}
    }

    let _ = write!(buf, "</{}>\n", tag);
}

fn write_indent(buf: &mut String, n: usize) {
    for _ in 0..n {
        buf.push_str("  ");
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_scalar_carries_the_namespace_declaration() {
        let tree = WireValue::map(vec![(
            "ieee802-dot1q-sched:gate-enabled",
            WireValue::Bool(true),
        )]);
        assert_eq!(
            encode(&tree),
            "<gate-enabled xmlns=\"urn:ieee:std:802.1Q:yang:ieee802-dot1q-sched\">true</gate-enabled>\n"
        );
    }

    #[test]
    fn integral_float_renders_without_decimal_point() {
        let tree = WireValue::map(vec![("plain", WireValue::Num(42.0))]);
        assert_eq!(encode(&tree), "<plain>42</plain>\n");
    }

    #[test]
    fn fractional_float_keeps_its_fraction() {
        let tree = WireValue::map(vec![("ratio", WireValue::Num(2.5))]);
        assert_eq!(encode(&tree), "<ratio>2.5</ratio>\n");
    }

    #[test]
    fn strings_are_escaped() {
        let tree = WireValue::map(vec![("description", WireValue::str("a<b & c>d"))]);
        assert_eq!(
            encode(&tree),
            "<description>a&lt;b &amp; c&gt;d</description>\n"
        );
    }

    #[test]
    fn sequences_repeat_the_tag_per_element() {
        let tree = WireValue::map(vec![(
            "interface",
            WireValue::seq(vec![
                WireValue::map(vec![("name", WireValue::str("sw0p2"))]),
                WireValue::map(vec![("name", WireValue::str("sw0p3"))]),
            ]),
        )]);
        let xml = encode(&tree);
        assert_eq!(xml.matches("<interface>").count(), 2);
        assert_eq!(xml.matches("</interface>").count(), 2);
    }

    #[test]
    fn gate_control_entries_are_not_double_wrapped() {
        let entry = WireValue::map(vec![
            ("index", WireValue::uint(0)),
            (
                "operation-name",
                WireValue::str("ieee802-dot1q-types:set-gate-states"),
            ),
            ("time-interval-value", WireValue::uint(500_000)),
            ("gate-states-value", WireValue::uint(0x81)),
        ]);
        let tree = WireValue::map(vec![("gate-control-entry", WireValue::seq(vec![entry]))]);
        let xml = encode(&tree);

        assert_eq!(xml.matches("<gate-control-entry>").count(), 1);
        // The identity's module prefix is stripped on the wire.
        assert!(xml.contains("<operation-name>set-gate-states</operation-name>"));
        assert!(xml.contains("<gate-states-value>129</gate-states-value>"));
    }

    #[test]
    fn entry_without_gate_states_omits_the_field() {
        let entry = WireValue::map(vec![
            ("index", WireValue::uint(1)),
            ("operation-name", WireValue::str("set-gate-states")),
            ("time-interval-value", WireValue::uint(1_000)),
        ]);
        let xml = encode(&entry);
        assert!(!xml.contains("gate-states-value"));
        assert!(xml.contains("<index>1</index>"));
    }

    #[test]
    fn null_emits_an_explicit_marker() {
        let tree = WireValue::map(vec![("placeholder", WireValue::Null)]);
        let xml = encode(&tree);
        assert!(xml.contains("<nil/>"), "got: {xml}");
    }

    #[test]
    fn non_finite_numbers_fail_loudly() {
        let tree = WireValue::map(vec![("broken", WireValue::Num(f64::NAN))]);
        let xml = encode(&tree);
        assert!(xml.contains("<unsupported"), "got: {xml}");
        assert!(!xml.contains("NaN"));
    }

    #[test]
    fn unknown_module_prefix_is_stripped_without_namespace() {
        let tree = WireValue::map(vec![("no-such-module:leaf", WireValue::uint(7))]);
        assert_eq!(encode(&tree), "<leaf>7</leaf>\n");
    }

    #[test]
    fn traversal_order_is_emission_order() {
        let tree = WireValue::map(vec![
            ("b", WireValue::uint(2)),
            ("a", WireValue::uint(1)),
        ]);
        let xml = encode(&tree);
        let b = xml.find("<b>").unwrap();
        let a = xml.find("<a>").unwrap();
        assert!(b < a, "map order must be preserved verbatim");
    }

    #[test]
    fn nested_maps_indent_two_spaces_per_level() {
        let tree = WireValue::map(vec![(
            "outer",
            WireValue::map(vec![("inner", WireValue::uint(1))]),
        )]);
        assert_eq!(encode(&tree), "<outer>\n  <inner>1</inner>\n</outer>\n");
    }
}
