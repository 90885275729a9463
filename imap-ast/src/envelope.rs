//! Envelope and address types.

use crate::core::NString;

/// The envelope of a message, as reported by `FETCH (ENVELOPE)`.
///
/// Ten fields; every one may be `NIL`. The address-valued fields are
/// already grouped (see [`AddressOrGroup::walk`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Envelope {
    pub date: NString,
    pub subject: NString,
    pub from: Vec<AddressOrGroup>,
    pub sender: Vec<AddressOrGroup>,
    pub reply_to: Vec<AddressOrGroup>,
    pub to: Vec<AddressOrGroup>,
    pub cc: Vec<AddressOrGroup>,
    pub bcc: Vec<AddressOrGroup>,
    pub in_reply_to: NString,
    pub message_id: NString,
}

/// A single wire-level address quadruple.
///
/// RFC 2822 group syntax is encoded in-band: `host == NIL` with a non-NIL
/// `mailbox` starts a group of that name, `host == NIL` with `mailbox ==
/// NIL` ends the innermost open group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Address {
    /// Display name (RFC 2822 phrase).
    pub name: NString,
    /// Source route. Obsolete, kept verbatim.
    pub adl: NString,
    /// Local part, or the group name for a group-start marker.
    pub mailbox: NString,
    /// Domain. `NIL` marks group syntax.
    pub host: NString,
}

impl Address {
    fn group_start(&self) -> bool {
        self.host.0.is_none() && self.mailbox.0.is_some()
    }

    fn group_end(&self) -> bool {
        self.host.0.is_none() && self.mailbox.0.is_none()
    }
}

/// A plain address or a (possibly nested) named group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressOrGroup {
    Address(Address),
    Group(AddressGroup),
}

/// An RFC 2822 address group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressGroup {
    /// The group's display name.
    pub name: NString,
    pub children: Vec<AddressOrGroup>,
}

impl AddressOrGroup {
    /// Fold a flat wire-level address list into a tree, honoring the
    /// group start/end markers.
    ///
    /// A group-end marker without an open group is dropped; groups left
    /// open at the end of the list are closed implicitly. Neither case is
    /// covered by the RFCs, and real servers produce both.
    pub fn walk(addresses: Vec<Address>) -> Vec<AddressOrGroup> {
        let mut top = Vec::new();
        let mut open: Vec<AddressGroup> = Vec::new();

        fn push(top: &mut Vec<AddressOrGroup>, open: &mut [AddressGroup], entry: AddressOrGroup) {
            match open.last_mut() {
                Some(group) => group.children.push(entry),
                None => top.push(entry),
            }
        }

        for address in addresses {
            if address.group_start() {
                open.push(AddressGroup {
                    name: address.mailbox,
                    children: Vec::new(),
                });
            } else if address.group_end() {
                if let Some(group) = open.pop() {
                    push(&mut top, &mut open, AddressOrGroup::Group(group));
                }
            } else {
                push(&mut top, &mut open, AddressOrGroup::Address(address));
            }
        }

        while let Some(group) = open.pop() {
            push(&mut top, &mut open, AddressOrGroup::Group(group));
        }

        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(mailbox: &str, host: &str) -> Address {
        Address {
            name: NString(None),
            adl: NString(None),
            mailbox: NString::try_from(mailbox).unwrap(),
            host: NString::try_from(host).unwrap(),
        }
    }

    fn group_start(name: &str) -> Address {
        Address {
            mailbox: NString::try_from(name).unwrap(),
            ..Default::default()
        }
    }

    fn group_end() -> Address {
        Address::default()
    }

    #[test]
    fn test_flat_list() {
        let walked = AddressOrGroup::walk(vec![addr("a", "x.org"), addr("b", "y.org")]);
        assert_eq!(
            walked,
            vec![
                AddressOrGroup::Address(addr("a", "x.org")),
                AddressOrGroup::Address(addr("b", "y.org")),
            ]
        );
    }

    #[test]
    fn test_single_group() {
        let walked = AddressOrGroup::walk(vec![
            group_start("friends"),
            addr("a", "x.org"),
            group_end(),
        ]);

        assert_eq!(
            walked,
            vec![AddressOrGroup::Group(AddressGroup {
                name: NString::try_from("friends").unwrap(),
                children: vec![AddressOrGroup::Address(addr("a", "x.org"))],
            })]
        );
    }

    #[test]
    fn test_nested_groups() {
        let walked = AddressOrGroup::walk(vec![
            group_start("outer"),
            group_start("inner"),
            addr("a", "x.org"),
            group_end(),
            group_end(),
        ]);

        let AddressOrGroup::Group(outer) = &walked[0] else {
            panic!("expected group");
        };
        assert_eq!(outer.name, NString::try_from("outer").unwrap());
        let AddressOrGroup::Group(inner) = &outer.children[0] else {
            panic!("expected nested group");
        };
        assert_eq!(inner.name, NString::try_from("inner").unwrap());
        assert_eq!(inner.children.len(), 1);
    }

    #[test]
    fn test_unterminated_group_is_closed() {
        let walked = AddressOrGroup::walk(vec![group_start("open"), addr("a", "x.org")]);

        assert_eq!(
            walked,
            vec![AddressOrGroup::Group(AddressGroup {
                name: NString::try_from("open").unwrap(),
                children: vec![AddressOrGroup::Address(addr("a", "x.org"))],
            })]
        );
    }

    #[test]
    fn test_stray_group_end_is_dropped() {
        let walked = AddressOrGroup::walk(vec![group_end(), addr("a", "x.org")]);
        assert_eq!(walked, vec![AddressOrGroup::Address(addr("a", "x.org"))]);
    }
}
