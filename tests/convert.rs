use pretty_assertions::assert_eq;

use leiflat::{convert_bytes, Config, ConvertError, Converter, Profile};

const RECORDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lei:LEIData xmlns:lei="http://www.leiroc.org/data/schema/leidata/2014">
  <lei:LEIHeader>
    <lei:ContentDate>2015-06-01T00:00:00Z</lei:ContentDate>
  </lei:LEIHeader>
  <lei:LEIRecords>
    <lei:LEIRecord>
      <lei:LEI>529900T8BM49AURSDO55</lei:LEI>
      <lei:Entity>
        <lei:LegalName xml:lang="de">Deutsche   Beispiel
          AG</lei:LegalName>
        <lei:LegalAddress><lei:Country>DE</lei:Country></lei:LegalAddress>
        <lei:LegalJurisdiction>DE</lei:LegalJurisdiction>
        <lei:LegalForm>
          <lei:EntityLegalFormCode>8888</lei:EntityLegalFormCode>
          <lei:OtherLegalForm>AKTIENGESELLSCHAFT</lei:OtherLegalForm>
        </lei:LegalForm>
        <lei:EntityStatus>ACTIVE</lei:EntityStatus>
      </lei:Entity>
      <lei:Registration>
        <lei:InitialRegistrationDate>2012-11-29T00:00:00Z</lei:InitialRegistrationDate>
        <lei:LastUpdateDate>2015-05-20T10:00:00Z</lei:LastUpdateDate>
      </lei:Registration>
    </lei:LEIRecord>
    <lei:LEIRecord>
      <lei:LEI>HWUPKR0MPOU8FGXBT394</lei:LEI>
      <lei:Entity>
        <lei:LegalName>O'Brien &amp; "Partners"</lei:LegalName>
        <lei:LegalForm>&lt;N/A&gt;</lei:LegalForm>
        <lei:LegalJurisdiction>US-DE</lei:LegalJurisdiction>
      </lei:Entity>
    </lei:LEIRecord>
  </lei:LEIRecords>
</lei:LEIData>
"#;

const FULL_PREAMBLE: &str = "\
@prefix lei: <http://openleis.com/legal_entities/> .
@prefix leiroc: <http://www.leiroc.org/data/schema/leidata/2014/> .
@prefix fibo-be-le-lei: <http://www.omg.org/spec/EDMC-FIBO/BE/LegalEntities/LEIEntities/> .
@prefix rov: <http://www.w3.org/ns/regorg#> .
@prefix gas: <http://schema.ga-group.nl/symbology#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

";

const REGISTRATIONS: &str = r#"<LEIRegistrations>
  <LEIRegistration>
    <LegalEntityIdentifier>5493001KJTIIGC8Y1R12</LegalEntityIdentifier>
    <RegisteredName>Bloomberg &amp;amp; Co  Finance</RegisteredName>
    <EntityLegalForm>LIMITED PARTNERSHIP</EntityLegalForm>
    <RegisteredCountryCode>US</RegisteredCountryCode>
    <EntityWebsiteAddress>http://www.example.com/?a=1&amp;amp;b=2</EntityWebsiteAddress>
  </LEIRegistration>
  <LEIRegistration>
    <LegalEntityIdentifier/>
    <RegisteredName>No Identifier Ltd</RegisteredName>
  </LEIRegistration>
</LEIRegistrations>
"#;

fn convert(input: &str, profile: Profile) -> String {
    let out = convert_bytes(input.as_bytes(), Config::new().with_profile(profile)).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn records_to_full_turtle() {
    let expected = format!(
        "{FULL_PREAMBLE}\
@prefix TIME: <2015-06-01T00:00:00Z> .
@prefix MODD: <2015-05-20T10:00:00Z> .
lei:529900T8BM49AURSDO55 a leiroc:LEI , fibo-be-le-lei:LegalEntityIdentifier , fibo-be-le-lei:ContractuallyCapableEntity ;
   gas:symbolOf <http://openleis.com/> ;
   leiroc:LegalName \"\"\"Deutsche Beispiel AG\"\"\"@de ;
   leiroc:InitialRegistrationDate \"2012-11-29T00:00:00Z\"^^xsd:dateTime ;
   leiroc:LastUpdateDate \"2015-05-20T10:00:00Z\"^^xsd:dateTime ;
   leiroc:EntityLegalFormCode \"8888\" ;
   leiroc:LegalForm \"\"\"AKTIENGESELLSCHAFT\"\"\" ;
   rov:orgType <http://openleis.com/legal_entities/search/legal_form/AKTIENGESELLSCHAFT> ;
   leiroc:LegalJurisdiction \"\"\"DE\"\"\" ;
   fibo-be-le-lei:isRecognizedIn <http://schema.ga-group.nl/jurisdictions#DE> ;
   rov:orgStatus \"ACTIVE\" .
lei:HWUPKR0MPOU8FGXBT394 a leiroc:LEI , fibo-be-le-lei:LegalEntityIdentifier , fibo-be-le-lei:ContractuallyCapableEntity ;
   gas:symbolOf <http://openleis.com/> ;
   leiroc:LegalName \"\"\"O'Brien & \\\"Partners\\\"\"\"\" ;
   leiroc:LegalJurisdiction \"\"\"US-DE\"\"\" ;
   fibo-be-le-lei:isRecognizedIn <http://schema.ga-group.nl/jurisdictions#US-DE> .
"
    );
    assert_eq!(convert(RECORDS, Profile::Turtle), expected);
}

#[test]
fn records_to_lite_turtle() {
    let input = r#"<LEIRecords>
  <LEIRecord>
    <LEI>529900T8BM49AURSDO55</LEI>
    <Entity>
      <LegalName>Deutsche   Beispiel
        AG</LegalName>
      <LegalForm>AKTIENGESELLSCHAFT</LegalForm>
      <LegalJurisdiction>DE</LegalJurisdiction>
    </Entity>
  </LEIRecord>
  <LEIRecord>
    <LEI>HWUPKR0MPOU8FGXBT394</LEI>
    <Entity><LegalName>O'Brien &amp; "Partners"</LegalName></Entity>
  </LEIRecord>
  <LEIRecord>
    <LEI>NONAME0000000000000X</LEI>
  </LEIRecord>
</LEIRecords>"#;
    let expected = "\
@prefix ol: <http://openleis.com/legal_entities/> .
@prefix lei: <http://www.leiroc.org/data/schema/leidata/2014/> .

ol:529900T8BM49AURSDO55 lei:LegalName \"Deutsche Beispiel AG\" ;
   lei:LegalForm \"AKTIENGESELLSCHAFT\" ;
   lei:LegalJurisdiction \"DE\" .
ol:HWUPKR0MPOU8FGXBT394 lei:LegalName \"O'Brien & \\\"Partners\\\"\" .
";
    assert_eq!(convert(input, Profile::TurtleLite), expected);
}

#[test]
fn registrations_to_tsv() {
    assert_eq!(
        convert(REGISTRATIONS, Profile::Tsv),
        "ol:5493001KJTIIGC8Y1R12\tBloomberg & Co Finance\thttp://www.example.com/?a=1&b=2\n"
    );
}

#[test]
fn registrations_to_full_turtle() {
    let expected = format!(
        "{FULL_PREAMBLE}\
lei:5493001KJTIIGC8Y1R12 a leiroc:LEI , fibo-be-le-lei:LegalEntityIdentifier , fibo-be-le-lei:ContractuallyCapableEntity ;
   gas:symbolOf <http://openleis.com/> ;
   leiroc:LegalName \"\"\"Bloomberg & Co Finance\"\"\" ;
   leiroc:LegalForm \"\"\"LIMITED PARTNERSHIP\"\"\" ;
   rov:orgType <http://openleis.com/legal_entities/search/legal_form/LIMITED PARTNERSHIP> ;
   leiroc:LegalJurisdiction \"\"\"US\"\"\" ;
   fibo-be-le-lei:isRecognizedIn <http://schema.ga-group.nl/jurisdictions#US> .
"
    );
    assert_eq!(convert(REGISTRATIONS, Profile::Turtle), expected);
}

#[test]
fn output_is_deterministic_across_chunk_sizes() {
    let whole = convert(RECORDS, Profile::Turtle);
    for chunk in [1, 7, 64, 4096] {
        let config = Config::new().with_read_chunk(chunk).with_output_capacity(1);
        let out = convert_bytes(RECORDS.as_bytes(), config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), whole, "chunk size {chunk}");
    }
}

#[test]
fn unrecognised_document_yields_nothing() {
    assert_eq!(convert("<Relationships><LEI>X</LEI></Relationships>", Profile::Turtle), "");
}

#[test]
fn malformed_document_is_an_error() {
    let err = convert_bytes(b"<LEIRecords><LEIRecord></LEIRecords>", Config::new()).unwrap_err();
    assert!(matches!(err, ConvertError::Malformed { .. }));
    assert!(err.to_string().contains("expected </LEIRecord>"));
}

#[test]
fn converter_keeps_going_after_a_bad_document() {
    let mut converter = Converter::new(Vec::new(), Config::new().with_profile(Profile::Tsv));
    assert!(converter.convert(&b"<LEIRegistrations>"[..]).is_err());
    let stats = converter.convert(REGISTRATIONS.as_bytes()).unwrap();
    assert_eq!((stats.emitted, stats.discarded), (1, 1));
    let out = String::from_utf8(converter.finish().unwrap()).unwrap();
    assert_eq!(out, "ol:5493001KJTIIGC8Y1R12\tBloomberg & Co Finance\thttp://www.example.com/?a=1&b=2\n");
}

#[test]
fn doctype_comment_with_apostrophe_is_skipped() {
    let input = "<!DOCTYPE LEIRegistrations [<!-- it's a comment -->]>\n<LEIRegistrations>\
        <LEIRegistration><LegalEntityIdentifier>P1</LegalEntityIdentifier>\
        <RegisteredName>N</RegisteredName></LEIRegistration></LEIRegistrations>";
    for chunk in [1, 5, 4096] {
        let config = Config::new().with_profile(Profile::Tsv).with_read_chunk(chunk);
        let out = convert_bytes(input.as_bytes(), config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ol:P1\tN\n", "chunk size {chunk}");
    }
}

#[test]
fn lite_turtle_legal_form_follows_nested_fields() {
    let input = r#"<LEIRecords>
  <LEIRecord>
    <LEI>A1</LEI>
    <Entity>
      <LegalName>Alpha</LegalName>
      <LegalForm>&lt;N/A&gt;</LegalForm>
    </Entity>
  </LEIRecord>
  <LEIRecord>
    <LEI>B2</LEI>
    <Entity>
      <LegalName>Beta</LegalName>
      <LegalForm>
        <EntityLegalFormCode>8888</EntityLegalFormCode>
        <OtherLegalForm>AG</OtherLegalForm>
      </LegalForm>
    </Entity>
  </LEIRecord>
</LEIRecords>"#;
    let expected = "\
@prefix ol: <http://openleis.com/legal_entities/> .
@prefix lei: <http://www.leiroc.org/data/schema/leidata/2014/> .

ol:A1 lei:LegalName \"Alpha\" .
ol:B2 lei:LegalName \"Beta\" ;
   lei:LegalForm \"AG\" .
";
    assert_eq!(convert(input, Profile::TurtleLite), expected);
}
