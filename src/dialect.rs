//! Schema dialects and their tag tables.
//!
//! Element local names map to a [`Token`] through one static lookup. Each
//! dialect is a [`Schema`]: its root token, how captured text is treated,
//! and a table of `(section, token) -> role` rules. Supporting another
//! dialect means adding another `Schema` to [`SCHEMAS`].

use phf::phf_map;

use crate::record::Field;

/// Which input shape the current document uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// No root element recognised yet
    #[default]
    Unrecognized,
    /// `LEIRecords`: nested `Entity` / `Registration` sections
    Records,
    /// `LEIRegistrations`: flat registration elements
    Registrations,
}

/// Nesting context inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Top,
    Entity,
    Registration,
}

/// Recognised element local names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    RecordsRoot,
    RegistrationsRoot,
    ContentDate,
    Record,
    RegistrationRecord,
    Entity,
    Registration,
    Lei,
    LegalName,
    LegalForm,
    EntityLegalFormCode,
    OtherLegalForm,
    LegalJurisdiction,
    EntityStatus,
    InitialRegistrationDate,
    LastUpdateDate,
    LegalEntityIdentifier,
    RegisteredName,
    EntityLegalForm,
    RegisteredCountryCode,
    EntityWebsiteAddress,
}

static TOKENS: phf::Map<&'static [u8], Token> = phf_map! {
    b"LEIRecords" => Token::RecordsRoot,
    b"LEIRegistrations" => Token::RegistrationsRoot,
    b"ContentDate" => Token::ContentDate,
    b"LEIRecord" => Token::Record,
    b"LEIRegistration" => Token::RegistrationRecord,
    b"Entity" => Token::Entity,
    b"Registration" => Token::Registration,
    b"LEI" => Token::Lei,
    b"LegalName" => Token::LegalName,
    b"LegalForm" => Token::LegalForm,
    b"EntityLegalFormCode" => Token::EntityLegalFormCode,
    b"OtherLegalForm" => Token::OtherLegalForm,
    b"LegalJurisdiction" => Token::LegalJurisdiction,
    b"EntityStatus" => Token::EntityStatus,
    b"InitialRegistrationDate" => Token::InitialRegistrationDate,
    b"LastUpdateDate" => Token::LastUpdateDate,
    b"LegalEntityIdentifier" => Token::LegalEntityIdentifier,
    b"RegisteredName" => Token::RegisteredName,
    b"EntityLegalForm" => Token::EntityLegalForm,
    b"RegisteredCountryCode" => Token::RegisteredCountryCode,
    b"EntityWebsiteAddress" => Token::EntityWebsiteAddress,
};

impl Token {
    /// Token for a local (prefix-stripped) element name
    #[inline]
    pub fn lookup(local_name: &[u8]) -> Option<Token> {
        TOKENS.get(local_name).copied()
    }
}

/// What a token means in a given section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Capture the element's text into a field
    Capture(Field),
    /// Start enters the section
    Enter(Section),
    /// End leaves the current section
    Leave,
    /// End closes the record
    Record,
    /// End closes the document
    Document,
}

/// Static description of one dialect
#[derive(Debug)]
pub struct Schema {
    pub dialect: Dialect,
    /// Root element that selects this dialect
    pub root: Token,
    /// Captured text still carries entity markup and is decoded per field
    pub decode_captures: bool,
    /// Field whose start tag may carry a `lang` attribute
    pub lang_field: Option<Field>,
    rules: &'static [(Section, Token, Role)],
}

impl Schema {
    /// Role of `token` while in `section`
    pub fn role(&self, section: Section, token: Token) -> Option<Role> {
        self.rules
            .iter()
            .find(|(s, t, _)| *s == section && *t == token)
            .map(|&(_, _, role)| role)
    }

    /// Schema whose root is `token`
    pub fn for_root(token: Token) -> Option<&'static Schema> {
        SCHEMAS.iter().find(|s| s.root == token)
    }
}

const RECORDS_RULES: &[(Section, Token, Role)] = &[
    (Section::Top, Token::Lei, Role::Capture(Field::Lei)),
    (Section::Top, Token::Entity, Role::Enter(Section::Entity)),
    (Section::Top, Token::Registration, Role::Enter(Section::Registration)),
    (Section::Top, Token::Record, Role::Record),
    (Section::Top, Token::RecordsRoot, Role::Document),
    (Section::Entity, Token::LegalName, Role::Capture(Field::LegalName)),
    (Section::Entity, Token::LegalForm, Role::Capture(Field::LegalForm)),
    (Section::Entity, Token::EntityLegalFormCode, Role::Capture(Field::LegalFormCode)),
    (Section::Entity, Token::OtherLegalForm, Role::Capture(Field::OtherLegalForm)),
    (Section::Entity, Token::LegalJurisdiction, Role::Capture(Field::Jurisdiction)),
    (Section::Entity, Token::EntityStatus, Role::Capture(Field::Status)),
    (Section::Entity, Token::Entity, Role::Leave),
    (Section::Registration, Token::InitialRegistrationDate, Role::Capture(Field::InitialRegistrationDate)),
    (Section::Registration, Token::LastUpdateDate, Role::Capture(Field::LastUpdateDate)),
    (Section::Registration, Token::Registration, Role::Leave),
];

const REGISTRATIONS_RULES: &[(Section, Token, Role)] = &[
    (Section::Top, Token::LegalEntityIdentifier, Role::Capture(Field::Lei)),
    (Section::Top, Token::RegisteredName, Role::Capture(Field::LegalName)),
    (Section::Top, Token::EntityLegalForm, Role::Capture(Field::LegalForm)),
    (Section::Top, Token::RegisteredCountryCode, Role::Capture(Field::Jurisdiction)),
    (Section::Top, Token::EntityWebsiteAddress, Role::Capture(Field::Website)),
    (Section::Top, Token::RegistrationRecord, Role::Record),
    (Section::Top, Token::RegistrationsRoot, Role::Document),
];

/// Every supported dialect
pub static SCHEMAS: [Schema; 2] = [
    Schema {
        dialect: Dialect::Records,
        root: Token::RecordsRoot,
        decode_captures: false,
        lang_field: Some(Field::LegalName),
        rules: RECORDS_RULES,
    },
    Schema {
        dialect: Dialect::Registrations,
        root: Token::RegistrationsRoot,
        decode_captures: true,
        lang_field: None,
        rules: REGISTRATIONS_RULES,
    },
];
