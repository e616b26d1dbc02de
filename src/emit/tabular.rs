//! Tab-separated output for joining against other entity datasets.
//!
//! One line per record: `ol:<id>`, the normalised name and, when present,
//! the normalised website. No preamble.

use super::{DocumentHeader, RecordView, Renderer};
use crate::error::Result;
use crate::record::Field;
use crate::text::{normalize_space, ByteSink};

pub struct Tabular;

impl Renderer for Tabular {
    fn preamble(&self, _header: &DocumentHeader<'_>, _out: &mut dyn ByteSink) -> Result<()> {
        Ok(())
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
        out.put(b"\t")?;
        normalize_space(name, out)?;
        if let Some(website) = r.get(Field::Website) {
            out.put(b"\t")?;
            normalize_space(website, out)?;
        }
        out.put(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ScratchArena;
    use crate::record::FieldTable;

    fn render(fields: &[(Field, &str)]) -> Vec<u8> {
        let mut arena = ScratchArena::new();
        let mut table = FieldTable::new();
        for &(field, text) in fields {
            let start = arena.push(text.as_bytes()).unwrap();
            table.open(field, start);
            table.close(field, arena.cursor().unwrap());
        }
        let view = RecordView::new(&arena, &table);
        let mut out = Vec::new();
        if Tabular.accepts(&view) {
            Tabular.render(&view, &mut out).unwrap();
        }
        out
    }

    #[test]
    fn test_line_with_website() {
        let out = render(&[
            (Field::Lei, "5299"),
            (Field::LegalName, " Foo\n  Bar "),
            (Field::Website, " http://foo.example/ "),
        ]);
        assert_eq!(out, b"ol:5299\tFoo Bar\thttp://foo.example/\n");
    }

    #[test]
    fn test_line_without_website() {
        assert_eq!(render(&[(Field::Lei, "1"), (Field::LegalName, "N")]), b"ol:1\tN\n");
    }

    #[test]
    fn test_name_is_required() {
        assert!(render(&[(Field::Lei, "1"), (Field::Website, "w")]).is_empty());
    }
}
