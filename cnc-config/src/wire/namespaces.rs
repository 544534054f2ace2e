/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Static YANG-module → XML-namespace table.
//!
//! Covers the IEEE 802.1Q / IEEE 1588 / IETF module set of the supported
//! switch schemas.  Keys of the form `module:tag` in a wire tree are resolved
//! here; a hit turns the opening tag into `<tag xmlns="URI">`.

/// Returns the XML namespace URI for a YANG module name, or `None` for
/// modules not in the table.
pub fn namespace_for(module: &str) -> Option<&'static str> {
    let ns = match module {
        "ieee802-types" => "urn:ieee:std:802.1Q:yang:ieee802-types",
        "ietf-interfaces" => "urn:ietf:params:xml:ns:yang:ietf-interfaces",
        "ietf-netconf-monitoring" => "urn:ietf:params:xml:ns:yang:ietf-netconf-monitoring",
        "iana-if-type" => "urn:ietf:params:xml:ns:yang:iana-if-type",
        "ieee802-dot1q-sched-bridge" => "urn:ieee:std:802.1Q:yang:ieee802-dot1q-sched", //-bridge
        "ietf-x509-cert-to-name" => "urn:ietf:params:xml:ns:yang:ietf-x509-cert-to-name",
        "ietf-yang-patch" => "urn:ietf:params:xml:ns:yang:ietf-yang-patch",
        "ieee802-dot1q-sched" => "urn:ieee:std:802.1Q:yang:ieee802-dot1q-sched",
        "ieee802-dot1q-types" => "urn:ieee:std:802.1Q:yang:ieee802-dot1q-types",
        "ieee1588-ptp-tt" => "urn:ieee:std:1588:yang:ieee1588-ptp-tt",
        "ieee802-dot1as-hs" => "urn:ieee:std:802.1AS:yang:ieee802-dot1as-hs",
        "ietf-inet-types" => "urn:ietf:params:xml:ns:yang:ietf-inet-types",
        "ieee802-dot1ab-types" => "urn:ieee:std:802.1Q:yang:ieee802-dot1ab-types",
        "ieee802-ethernet-interface" => "urn:ieee:std:802.3:yang:ieee802-ethernet-interface",
        "ietf-ip" => "urn:ietf:params:xml:ns:yang:ietf-ip",
        "ieee802-dot1as-gptp" => "urn:ieee:std:802.1AS:yang:ieee802-dot1as-gptp",
        "iana-hardware" => "urn:ietf:params:xml:ns:yang:iana-hardware",
        "iecieee60802-ethernet-interface" => "urn:ieee:std:60802:yang:iecieee60802-ethernet-interface",
        "ieee802-dot1dc-sched-if" => "urn:ieee:std:802.1Q:yang:ieee802-dot1dc-sched-if",
        "ietf-datastores" => "urn:ietf:params:xml:ns:yang:ietf-datastores",
        "ieee802-dot1q-bridge" => "urn:ieee:std:802.1Q:yang:ieee802-dot1q-bridge",
        "ietf-restconf" => "urn:ietf:params:xml:ns:yang:ietf-restconf",
        "ietf-routing" => "urn:ietf:params:xml:ns:yang:ietf-routing",
        "ietf-yang-schema-mount" => "urn:ietf:params:xml:ns:yang:ietf-yang-schema-mount",
        "ietf-yang-types" => "urn:ietf:params:xml:ns:yang:ietf-yang-types",
        "ieee802-dot1q-stream-filters-gates" => {
            "urn:ieee:std:802.1Q:yang:ieee802-dot1q-stream-filters-gates"
        }
        "iana-crypt-hash" => "urn:ietf:params:xml:ns:yang:iana-crypt-hash",
        _ => return None,
    };
    Some(ns)
}

/// Splits a `module:tag` key and resolves the module.
///
/// Returns `(tag, namespace)`.  The module prefix is stripped in every case;
/// the namespace is `Some` only when the module is known.  Keys without a
/// colon pass through unchanged.
pub fn split_qualified(key: &str) -> (&str, Option<&'static str>) {
    match key.split_once(':') {
        Some((module, tag)) => (tag, namespace_for(module)),
        None => (key, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_module_resolves() {
        assert_eq!(
            namespace_for("ieee802-dot1q-sched"),
            Some("urn:ieee:std:802.1Q:yang:ieee802-dot1q-sched")
        );
    }

    #[test]
    fn sched_bridge_shares_the_sched_namespace() {
        assert_eq!(
            namespace_for("ieee802-dot1q-sched-bridge"),
            namespace_for("ieee802-dot1q-sched"),
        );
    }

    #[test]
    fn split_strips_the_prefix_even_for_unknown_modules() {
        assert_eq!(split_qualified("no-such-module:leaf"), ("leaf", None));
        assert_eq!(split_qualified("bare-tag"), ("bare-tag", None));
        let (tag, ns) = split_qualified("ietf-interfaces:interfaces");
        assert_eq!(tag, "interfaces");
        assert_eq!(ns, Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"));
    }
}
