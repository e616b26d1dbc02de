//! Turtle renderers.
//!
//! Each record becomes one subject followed by `;`-separated
//! predicate/object pairs and a closing `.`. Long literals use triple
//! quotes; names are whitespace-normalised before escaping.

use super::{DocumentHeader, RecordView, Renderer};
use crate::error::Result;
use crate::record::Field;
use crate::text::{escape_iri, escape_literal, escape_normalized, ByteSink};

const FULL_PREAMBLE: &[u8] = b"\
@prefix lei: <http://openleis.com/legal_entities/> .
@prefix leiroc: <http://www.leiroc.org/data/schema/leidata/2014/> .
@prefix fibo-be-le-lei: <http://www.omg.org/spec/EDMC-FIBO/BE/LegalEntities/LEIEntities/> .
@prefix rov: <http://www.w3.org/ns/regorg#> .
@prefix gas: <http://schema.ga-group.nl/symbology#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

";

const LITE_PREAMBLE: &[u8] = b"\
@prefix ol: <http://openleis.com/legal_entities/> .
@prefix lei: <http://www.leiroc.org/data/schema/leidata/2014/> .

";

const NEXT: &[u8] = b";\n   ";
const LEGAL_FORM_BASE: &[u8] = b"http://openleis.com/legal_entities/search/legal_form/";
const JURISDICTION_BASE: &[u8] = b"http://schema.ga-group.nl/jurisdictions#";

/// `@prefix NAME: <value> .` line
fn prefix_line(out: &mut dyn ByteSink, name: &[u8], value: &[u8]) -> Result<()> {
    out.put(b"@prefix ")?;
    out.put(name)?;
    out.put(b": <")?;
    escape_iri(value, out)?;
    out.put(b"> .\n")
}

/// `pred """value""" ` with the value escaped
fn long_literal(out: &mut dyn ByteSink, pred: &[u8], value: &[u8]) -> Result<()> {
    out.put(NEXT)?;
    out.put(pred)?;
    out.put(b" \"\"\"")?;
    escape_literal(value, out)?;
    out.put(b"\"\"\" ")
}

/// `pred "value"SUFFIX `
fn short_literal(out: &mut dyn ByteSink, pred: &[u8], value: &[u8], suffix: &[u8]) -> Result<()> {
    out.put(NEXT)?;
    out.put(pred)?;
    out.put(b" \"")?;
    escape_literal(value, out)?;
    out.put(b"\"")?;
    out.put(suffix)?;
    out.put(b" ")
}

/// `pred <base value> `
fn iri(out: &mut dyn ByteSink, pred: &[u8], base: &[u8], value: &[u8]) -> Result<()> {
    out.put(NEXT)?;
    out.put(pred)?;
    out.put(b" <")?;
    out.put(base)?;
    escape_iri(value, out)?;
    out.put(b"> ")
}

/// Legal form as literal and as organisation type
fn legal_form(out: &mut dyn ByteSink, form: &[u8]) -> Result<()> {
    long_literal(out, b"leiroc:LegalForm", form)?;
    iri(out, b"rov:orgType", LEGAL_FORM_BASE, form)
}

/// Full profile: every captured field, with typed dates and derived IRIs
pub struct FullTurtle;

impl Renderer for FullTurtle {
    fn preamble(&self, header: &DocumentHeader<'_>, out: &mut dyn ByteSink) -> Result<()> {
        out.put(FULL_PREAMBLE)?;
        if let Some(date) = header.content_date {
            prefix_line(out, b"TIME", date)?;
        }
        Ok(())
    }

    fn render(&self, r: &RecordView<'_>, out: &mut dyn ByteSink) -> Result<()> {
        let Some(lei) = r.get(Field::Lei) else {
            return Ok(());
        };
        let updated = r.get(Field::LastUpdateDate);

        // provenance
        if let Some(date) = updated {
            prefix_line(out, b"MODD", date)?;
        }

        out.put(b"lei:")?;
        out.put(lei)?;
        out.put(b" a leiroc:LEI , fibo-be-le-lei:LegalEntityIdentifier , fibo-be-le-lei:ContractuallyCapableEntity ")?;
        out.put(NEXT)?;
        out.put(b"gas:symbolOf <http://openleis.com/> ")?;

        if let Some(name) = r.get(Field::LegalName) {
            out.put(NEXT)?;
            out.put(b"leiroc:LegalName \"\"\"")?;
            escape_normalized(name, out)?;
            match r.lang() {
                Some(lang) => {
                    out.put(b"\"\"\"@")?;
                    out.put(lang)?;
                    out.put(b" ")?;
                }
                None => out.put(b"\"\"\" ")?,
            }
        }
        if let Some(date) = r.get(Field::InitialRegistrationDate) {
            short_literal(out, b"leiroc:InitialRegistrationDate", date, b"^^xsd:dateTime")?;
        }
        if let Some(date) = updated {
            short_literal(out, b"leiroc:LastUpdateDate", date, b"^^xsd:dateTime")?;
        }
        if let Some(code) = r.value(Field::LegalFormCode) {
            short_literal(out, b"leiroc:EntityLegalFormCode", code, b"")?;
        }
        if let Some(form) = r.legal_form_text() {
            legal_form(out, form)?;
        }
        if let Some(jurisdiction) = r.get(Field::Jurisdiction) {
            long_literal(out, b"leiroc:LegalJurisdiction", jurisdiction)?;
            iri(out, b"fibo-be-le-lei:isRecognizedIn", JURISDICTION_BASE, jurisdiction)?;
        }
        if let Some(status) = r.get(Field::Status) {
            short_literal(out, b"rov:orgStatus", status, b"")?;
        }

        out.put(b".\n")
    }
}

/// Lite profile: name, legal form and jurisdiction under short prefixes
pub struct LiteTurtle;

impl Renderer for LiteTurtle {
    fn preamble(&self, _header: &DocumentHeader<'_>, out: &mut dyn ByteSink) -> Result<()> {
        out.put(LITE_PREAMBLE)
    }

    fn accepts(&self, r: &RecordView<'_>) -> bool {
        r.has(Field::Lei) && r.has(Field::LegalName)
    }

    fn render(&self, r: &RecordView<'_>, out: &mut dyn ByteSink) -> Result<()> {
        let (Some(lei), Some(name)) = (r.get(Field::Lei), r.get(Field::LegalName)) else {
            return Ok(());
        };
        out.put(b"ol:")?;
        out.put(lei)?;
        out.put(b" lei:LegalName \"")?;
        escape_normalized(name, out)?;
        out.put(b"\" ")?;
        if let Some(form) = r.legal_form_text() {
            short_literal(out, b"lei:LegalForm", form, b"")?;
        }
        if let Some(jurisdiction) = r.get(Field::Jurisdiction) {
            short_literal(out, b"lei:LegalJurisdiction", jurisdiction, b"")?;
        }
        out.put(b".\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ScratchArena;
    use crate::record::{FieldTable, LangTag};

    fn render<R: Renderer>(renderer: &R, fields: &[(Field, &str)], lang: Option<&str>) -> String {
        let mut arena = ScratchArena::new();
        let mut table = FieldTable::new();
        for &(field, text) in fields {
            let start = arena.push(text.as_bytes()).unwrap();
            table.open(field, start);
            table.close(field, arena.cursor().unwrap());
        }
        if let Some(lang) = lang {
            table.set_lang(LangTag::new(lang.as_bytes()));
        }
        let view = RecordView::new(&arena, &table);
        let mut out = Vec::new();
        if renderer.accepts(&view) {
            renderer.render(&view, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_minimal_record() {
        assert_eq!(
            render(&FullTurtle, &[(Field::Lei, "ABC")], None),
            "lei:ABC a leiroc:LEI , fibo-be-le-lei:LegalEntityIdentifier , \
             fibo-be-le-lei:ContractuallyCapableEntity ;\n   gas:symbolOf <http://openleis.com/> .\n"
        );
    }

    #[test]
    fn test_name_is_normalised_and_tagged() {
        let out = render(
            &FullTurtle,
            &[(Field::Lei, "X"), (Field::LegalName, "  ACME \n  \"Best\"  Corp ")],
            Some("en"),
        );
        assert!(out.ends_with(";\n   leiroc:LegalName \"\"\"ACME \\\"Best\\\" Corp\"\"\"@en .\n"));
    }

    #[test]
    fn test_update_date_adds_provenance_prefix() {
        let out = render(
            &FullTurtle,
            &[(Field::Lei, "X"), (Field::LastUpdateDate, "2015-01-02T00:00:00Z")],
            None,
        );
        assert!(out.starts_with("@prefix MODD: <2015-01-02T00:00:00Z> .\nlei:X "));
        assert!(out.contains("leiroc:LastUpdateDate \"2015-01-02T00:00:00Z\"^^xsd:dateTime "));
    }

    #[test]
    fn test_code_supersedes_generic_form() {
        let out = render(
            &FullTurtle,
            &[(Field::Lei, "X"), (Field::LegalForm, "GMBH"), (Field::LegalFormCode, "2HBR")],
            None,
        );
        assert!(out.contains("leiroc:EntityLegalFormCode \"2HBR\" "));
        assert!(!out.contains("rov:orgType"));
    }

    #[test]
    fn test_generic_form_with_iri() {
        let out = render(&FullTurtle, &[(Field::Lei, "X"), (Field::LegalForm, "A<B")], None);
        assert!(out.contains("leiroc:LegalForm \"\"\"A<B\"\"\" "));
        assert!(out.contains(
            "rov:orgType <http://openleis.com/legal_entities/search/legal_form/A\\u003CB> "
        ));
    }

    #[test]
    fn test_placeholder_form_is_skipped() {
        let out = render(&FullTurtle, &[(Field::Lei, "X"), (Field::LegalForm, "<N/A>")], None);
        assert!(!out.contains("LegalForm"));
    }

    #[test]
    fn test_jurisdiction_and_status() {
        let out = render(
            &FullTurtle,
            &[(Field::Lei, "X"), (Field::Jurisdiction, "DE"), (Field::Status, "ACTIVE")],
            None,
        );
        assert!(out.contains(
            ";\n   leiroc:LegalJurisdiction \"\"\"DE\"\"\" ;\n   \
             fibo-be-le-lei:isRecognizedIn <http://schema.ga-group.nl/jurisdictions#DE> "
        ));
        assert!(out.ends_with(";\n   rov:orgStatus \"ACTIVE\" .\n"));
    }

    #[test]
    fn test_preamble_with_content_date() {
        let mut out = Vec::new();
        let header = DocumentHeader {
            content_date: Some(&b"2015-03-01"[..]),
        };
        FullTurtle.preamble(&header, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("@prefix lei: <http://openleis.com/legal_entities/> .\n"));
        assert!(text.ends_with("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\n@prefix TIME: <2015-03-01> .\n"));
    }

    #[test]
    fn test_lite_record() {
        let out = render(
            &LiteTurtle,
            &[
                (Field::Lei, "L"),
                (Field::LegalName, "Foo\tBar"),
                (Field::LegalForm, "AG"),
                (Field::Jurisdiction, "CH"),
            ],
            Some("de"),
        );
        assert_eq!(
            out,
            "ol:L lei:LegalName \"Foo Bar\" ;\n   lei:LegalForm \"AG\" ;\n   lei:LegalJurisdiction \"CH\" .\n"
        );
    }

    #[test]
    fn test_lite_requires_name() {
        assert_eq!(render(&LiteTurtle, &[(Field::Lei, "L")], None), "");
    }

    #[test]
    fn test_lite_skips_placeholder_form() {
        let out = render(
            &LiteTurtle,
            &[(Field::Lei, "L"), (Field::LegalName, "N"), (Field::LegalForm, "<N/A>")],
            None,
        );
        assert_eq!(out, "ol:L lei:LegalName \"N\" .\n");
    }

    #[test]
    fn test_lite_prefers_other_form_over_enclosing_form() {
        let out = render(
            &LiteTurtle,
            &[
                (Field::Lei, "L"),
                (Field::LegalName, "N"),
                (Field::LegalForm, "\n  8888AG"),
                (Field::LegalFormCode, "8888"),
                (Field::OtherLegalForm, "AG"),
            ],
            None,
        );
        assert_eq!(out, "ol:L lei:LegalName \"N\" ;\n   lei:LegalForm \"AG\" .\n");
    }

    #[test]
    fn test_lite_code_alone_hides_enclosing_form() {
        let out = render(
            &LiteTurtle,
            &[
                (Field::Lei, "L"),
                (Field::LegalName, "N"),
                (Field::LegalForm, "\n  8888"),
                (Field::LegalFormCode, "8888"),
            ],
            None,
        );
        assert!(!out.contains("LegalForm \""));
    }
}
