//! Body structure types, i.e., the value of `FETCH (BODY)` and
//! `FETCH (BODYSTRUCTURE)`.

use crate::{
    core::{IString, NString, Vec1},
    envelope::Envelope,
};

/// The BODY/BODYSTRUCTURE of a message: a tree of single parts and
/// multiparts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyStructure {
    /// A single part (`body-type-1part`).
    Single {
        body: Body,
        /// Extension data, only present in BODYSTRUCTURE.
        extension_data: Option<SinglePartExtensionData>,
    },
    /// A multipart (`body-type-mpart`).
    Multi {
        bodies: Vec1<BodyStructure>,
        subtype: IString,
        extension_data: Option<MultiPartExtensionData>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Body {
    pub basic: BasicFields,
    pub specific: SpecificFields,
}

/// The fields shared by all single-part body types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicFields {
    /// List of attribute/value pairs (`body-fld-param`).
    pub parameter_list: Vec<(IString, NString)>,
    /// Content-ID (`body-fld-id`).
    pub id: NString,
    /// Content-Description (`body-fld-desc`).
    pub description: NString,
    /// Content-Transfer-Encoding (`body-fld-enc`).
    pub content_transfer_encoding: IString,
    /// Size in octets (`body-fld-octets`).
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpecificFields {
    /// Neither `TEXT` nor `MESSAGE/RFC822`.
    Basic {
        r#type: IString,
        subtype: IString,
    },
    /// `MESSAGE/RFC822`: carries the envelope and body of the embedded
    /// message plus its size in lines.
    Message {
        envelope: Box<Envelope>,
        body_structure: Box<BodyStructure>,
        number_of_lines: u32,
    },
    /// `TEXT/...`: carries the size in lines.
    Text {
        subtype: IString,
        number_of_lines: u32,
    },
}

/// Trailing extension fields of a single part. The fields are positional
/// on the wire; a server stops at any point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SinglePartExtensionData {
    /// `body-fld-md5`
    pub md5: NString,
    pub tail: Option<Disposition>,
}

/// Trailing extension fields of a multipart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiPartExtensionData {
    /// `body-fld-param`
    pub parameter_list: Vec<(IString, NString)>,
    pub tail: Option<Disposition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Disposition {
    /// `body-fld-dsp`: disposition type and parameter list.
    pub disposition: Option<(IString, Vec<(IString, NString)>)>,
    pub tail: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    /// `body-fld-lang`
    pub language: Vec<IString>,
    pub tail: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// `body-fld-loc`
    pub location: NString,
    /// Future expansion, `*(SP body-extension)`.
    pub extensions: Vec<BodyExtension>,
}

/// `body-extension`: a string, a number, or a parenthesized list thereof.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyExtension {
    NString(NString),
    Number(u32),
    List(Vec1<BodyExtension>),
}
