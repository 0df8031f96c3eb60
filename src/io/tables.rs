use crate::error::Result;
use crate::weighting::{PeptideRow, TaxonWeight};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Writes peptide-taxon rows as `sequence,score,psms,taxon,weight,log_weight`.
pub fn write_peptide_table<W: Write>(writer: W, rows: &[PeptideRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes taxon weights as `taxon,log_weight,scaled_weight,unique`, keeping the given order.
pub fn write_taxa_table<W: Write>(writer: W, taxa: &[TaxonWeight]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for taxon in taxa {
        wtr.serialize(taxon)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a table written by [`write_taxa_table`], in file order.
pub fn read_taxa_table<R: Read>(reader: R) -> Result<Vec<TaxonWeight>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut taxa = Vec::new();
    for record in rdr.deserialize::<TaxonWeight>() {
        taxa.push(record?);
    }
    Ok(taxa)
}

pub fn write_peptide_table_file(path: &Path, rows: &[PeptideRow]) -> Result<()> {
    write_peptide_table(File::create(path)?, rows)
}

pub fn write_taxa_table_file(path: &Path, taxa: &[TaxonWeight]) -> Result<()> {
    write_taxa_table(File::create(path)?, taxa)
}

pub fn read_taxa_table_file(path: &Path) -> Result<Vec<TaxonWeight>> {
    read_taxa_table(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxa_table_keeps_order() {
        let taxa = vec![
            TaxonWeight {
                taxon: 562,
                log_weight: 2.5,
                scaled_weight: 2.5,
                unique: true,
            },
            TaxonWeight {
                taxon: 1280,
                log_weight: 0.25,
                scaled_weight: 0.25,
                unique: false,
            },
        ];

        let mut out = Vec::new();
        write_taxa_table(&mut out, &taxa).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("taxon,log_weight,scaled_weight,unique\n562,2.5,2.5,true\n"));

        assert_eq!(read_taxa_table(out.as_slice()).unwrap(), taxa);
    }

    #[test]
    fn test_peptide_table_header() {
        let rows = vec![PeptideRow {
            sequence: "AAAK".to_string(),
            score: 0.9,
            psms: 2,
            taxon: 562,
            weight: 2.0,
            log_weight: 3f64.log10(),
        }];

        let mut out = Vec::new();
        write_peptide_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("sequence,score,psms,taxon,weight,log_weight"));
        assert!(lines.next().unwrap().starts_with("AAAK,0.9,2,562,2.0,"));
    }
}
