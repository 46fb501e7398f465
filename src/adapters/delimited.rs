//! Loaders for the semicolon-delimited inputs: catalog, group map and
//! payroll rows. They only shape records; all rules live in `core`.

use crate::core::aggregation::GroupMap;
use crate::core::catalog::is_code;
use crate::domain::model::{DataQualityWarning, GroupLayout, PayrollRow, SourceRow};
use crate::utils::error::{PayrollError, Result};
use csv::{ReaderBuilder, Trim};

pub const DEFAULT_DELIMITER: u8 = b';';

fn read_records(text: &str, delimiter: u8) -> Result<Vec<SourceRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Whitespace-only lines; a row of bare delimiters still goes through.
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(SourceRow::new(line, record.iter()).with_delimiter(char::from(delimiter)));
    }
    Ok(rows)
}

fn is_header(row: &SourceRow, first_label: &str) -> bool {
    row.fields
        .first()
        .is_some_and(|f| f.eq_ignore_ascii_case(first_label))
}

/// Catalog records, without the optional `COD;TIPO;DES;VALOR` header.
pub fn read_catalog_rows(text: &str, delimiter: u8) -> Result<Vec<SourceRow>> {
    let mut rows = read_records(text, delimiter)?;
    if rows.first().is_some_and(|row| is_header(row, "COD")) {
        rows.remove(0);
    }
    Ok(rows)
}

fn split_codes(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|c| !c.is_empty())
}

struct GroupMapBuilder {
    map: GroupMap,
    warnings: Vec<DataQualityWarning>,
}

impl GroupMapBuilder {
    fn new() -> Self {
        Self {
            map: GroupMap::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: DataQualityWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn assign_cell(&mut self, row: &SourceRow, raw: &str, group: &str, cell: &str) {
        for code in split_codes(cell) {
            if !is_code(code) {
                self.warn(DataQualityWarning::InvalidCode {
                    line: row.line,
                    code: code.to_string(),
                    raw: raw.to_string(),
                });
                continue;
            }
            if let Some(previous) = self.map.assign(code, group) {
                self.warn(DataQualityWarning::GroupReassigned {
                    code: code.to_string(),
                    previous,
                    current: group.to_string(),
                });
            }
        }
    }
}

/// Reads a code → group mapping in either supported layout.
pub fn read_group_map(
    text: &str,
    delimiter: u8,
    layout: GroupLayout,
) -> Result<(GroupMap, Vec<DataQualityWarning>)> {
    let rows = read_records(text, delimiter)?;
    let mut builder = GroupMapBuilder::new();

    match layout {
        GroupLayout::Rows => {
            let skip = usize::from(rows.first().is_some_and(|row| is_header(row, "GRUPO")));
            for row in rows.iter().skip(skip) {
                let raw = row.raw();
                match row.fields.split_first() {
                    Some((group, cells)) if !group.is_empty() && !cells.is_empty() => {
                        for cell in cells {
                            builder.assign_cell(row, &raw, group, cell);
                        }
                    }
                    _ => builder.warn(DataQualityWarning::MalformedGroupRow {
                        line: row.line,
                        raw,
                    }),
                }
            }
        }
        GroupLayout::Columns => {
            let Some((labels, body)) = rows.split_first() else {
                return Ok((builder.map, builder.warnings));
            };
            for row in body {
                let raw = row.raw();
                for (column, cell) in row.fields.iter().enumerate() {
                    if cell.is_empty() {
                        continue;
                    }
                    match labels.fields.get(column).filter(|label| !label.is_empty()) {
                        Some(group) => builder.assign_cell(row, &raw, group, cell),
                        None => builder.warn(DataQualityWarning::MalformedGroupRow {
                            line: row.line,
                            raw: raw.clone(),
                        }),
                    }
                }
            }
        }
    }

    tracing::debug!("Group map loaded with {} codes", builder.map.len());
    Ok((builder.map, builder.warnings))
}

fn column_index(header: &SourceRow, column: &str, source_name: &str) -> Result<usize> {
    header
        .fields
        .iter()
        .position(|f| f.eq_ignore_ascii_case(column))
        .ok_or_else(|| PayrollError::MissingColumnError {
            column: column.to_string(),
            source_name: source_name.to_string(),
        })
}

/// Payroll rows located by the `COD` and `VALOR` header columns; other
/// columns are ignored.
pub fn read_payroll_rows(
    text: &str,
    delimiter: u8,
    source_name: &str,
) -> Result<(Vec<PayrollRow>, Vec<DataQualityWarning>)> {
    let rows = read_records(text, delimiter)?;
    let Some((header, body)) = rows.split_first() else {
        return Ok((Vec::new(), Vec::new()));
    };

    let code_at = column_index(header, "COD", source_name)?;
    let value_at = column_index(header, "VALOR", source_name)?;

    let mut payroll = Vec::with_capacity(body.len());
    let mut warnings = Vec::new();

    for row in body {
        match (row.fields.get(code_at), row.fields.get(value_at)) {
            (Some(code), Some(value)) if !code.is_empty() => {
                payroll.push(PayrollRow::new(row.line, code.as_str(), value.as_str()));
            }
            _ => {
                let warning = DataQualityWarning::MalformedPayrollRow {
                    line: row.line,
                    raw: row.raw(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok((payroll, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_header_is_skipped() {
        let text = "COD;TIPO;DES;VALOR\n1;P;Horas Normais;175.851,23\n3;P;Horas DSR;165,60\n";
        let rows = read_catalog_rows(text, DEFAULT_DELIMITER).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].fields, vec!["1", "P", "Horas Normais", "175.851,23"]);
    }

    #[test]
    fn test_catalog_without_header_and_short_rows() {
        let text = "1;P;Horas Normais;175.851,23\n1254;D;Desconto Alimentação\n";
        let rows = read_catalog_rows(text, DEFAULT_DELIMITER).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields.len(), 3);
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn test_fields_are_trimmed_and_blank_lines_ignored() {
        let text = " 9 ; P ; Horas Atestado ; 902,03 \n\n   \n";
        let rows = read_catalog_rows(text, DEFAULT_DELIMITER).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields, vec!["9", "P", "Horas Atestado", "902,03"]);
    }

    #[test]
    fn test_group_map_rows_layout() {
        let text = "GRUPO;CODS\nSalários;1, 3,7\nEncargos;104,105\n";
        let (map, warnings) = read_group_map(text, DEFAULT_DELIMITER, GroupLayout::Rows).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(map.len(), 5);
        assert_eq!(map.group_of("3"), Some("Salários"));
        assert_eq!(map.group_of("105"), Some("Encargos"));
    }

    #[test]
    fn test_group_map_rows_reports_malformed_and_reassigned() {
        let text = "Salários;1,3\nSemCodigos\nEncargos;3,x1\n";
        let (map, warnings) = read_group_map(text, DEFAULT_DELIMITER, GroupLayout::Rows).unwrap();

        assert_eq!(map.group_of("3"), Some("Encargos"));
        assert_eq!(warnings.len(), 3);
        assert!(matches!(warnings[0], DataQualityWarning::MalformedGroupRow { line: 2, .. }));
        assert!(matches!(
            warnings[1],
            DataQualityWarning::GroupReassigned { ref previous, .. } if previous == "Salários"
        ));
        assert!(matches!(warnings[2], DataQualityWarning::InvalidCode { ref code, .. } if code == "x1"));
    }

    #[test]
    fn test_group_map_columns_layout() {
        let text = "Salários;Encargos;Benefícios\n1;104;124\n3;105;\n7;;\n";
        let (map, warnings) = read_group_map(text, DEFAULT_DELIMITER, GroupLayout::Columns).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(map.len(), 6);
        assert_eq!(map.group_of("7"), Some("Salários"));
        assert_eq!(map.group_of("105"), Some("Encargos"));
        assert_eq!(map.group_of("124"), Some("Benefícios"));
    }

    #[test]
    fn test_group_map_columns_without_label() {
        let text = "Salários\n1;999\n";
        let (map, warnings) = read_group_map(text, DEFAULT_DELIMITER, GroupLayout::Columns).unwrap();

        assert_eq!(map.group_of("1"), Some("Salários"));
        assert_eq!(map.group_of("999"), None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_payroll_rows_by_header_name() {
        let text = "MATRICULA;cod;DESCRICAO;valor\n0042;1;Horas Normais;175.851,23\n0042;999;Outro;10,00\n";
        let (rows, warnings) = read_payroll_rows(text, DEFAULT_DELIMITER, "folha.csv").unwrap();

        assert!(warnings.is_empty());
        assert_eq!(
            rows,
            vec![
                PayrollRow::new(2, "1", "175.851,23"),
                PayrollRow::new(3, "999", "10,00"),
            ]
        );
    }

    #[test]
    fn test_payroll_short_row_is_reported() {
        let text = "COD;VALOR\n1;10,00\n2\n";
        let (rows, warnings) = read_payroll_rows(text, DEFAULT_DELIMITER, "folha.csv").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            warnings,
            vec![DataQualityWarning::MalformedPayrollRow {
                line: 3,
                raw: "2".to_string()
            }]
        );
    }

    #[test]
    fn test_payroll_missing_column_is_an_error() {
        let text = "COD;DESCRICAO\n1;Horas\n";
        match read_payroll_rows(text, DEFAULT_DELIMITER, "folha.csv") {
            Err(PayrollError::MissingColumnError { column, .. }) => assert_eq!(column, "VALOR"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(read_catalog_rows("", DEFAULT_DELIMITER).unwrap().is_empty());
        let (rows, warnings) = read_payroll_rows("", DEFAULT_DELIMITER, "folha.csv").unwrap();
        assert!(rows.is_empty() && warnings.is_empty());
    }

    #[test]
    fn test_tab_delimiter() {
        let rows = read_catalog_rows("1\tP\tHoras Normais\t175.851,23\n", b'\t').unwrap();
        assert_eq!(rows[0].fields.len(), 4);
        assert_eq!(rows[0].raw(), "1\tP\tHoras Normais\t175.851,23");
    }

    #[test]
    fn test_row_of_bare_delimiters_is_kept() {
        let text = "1;P;Horas Normais;175.851,23\n;;;\n\n";
        let rows = read_catalog_rows(text, DEFAULT_DELIMITER).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[1].fields, vec!["", "", "", ""]);
    }

    #[test]
    fn test_payroll_row_of_bare_delimiters_is_reported() {
        let text = "COD;VALOR\n;\n1;10,00\n";
        let (rows, warnings) = read_payroll_rows(text, DEFAULT_DELIMITER, "folha.csv").unwrap();

        assert_eq!(rows, vec![PayrollRow::new(3, "1", "10,00")]);
        assert_eq!(
            warnings,
            vec![DataQualityWarning::MalformedPayrollRow {
                line: 2,
                raw: ";".to_string()
            }]
        );
    }
}
