//! Parser CSV mínimo: una línea por registro, celdas separadas por un
//! delimitador fijo.
//!
//! No hay comillas, escapes ni campos multilínea: cada celda es el texto
//! crudo entre delimitadores y las líneas no se recortan. Una línea termina en
//! `\n`, `\r\n` o un `\r` suelto (exportaciones de Excel para Mac); el
//! terminador se descarta.
//!
//! Filas cortas (menos celdas que columnas en el header) se resuelven según
//! `ShortRowPolicy`; las celdas sobrantes de una fila larga se ignoran. Una
//! línea en blanco es una fila con una única celda vacía, por lo que sólo es
//! válida tal cual con un header de una columna.
use std::io::{self, BufRead, BufReader, ErrorKind, Read};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DELIMITER;
use crate::errors::ParseError;
use crate::model::{Dataset, Row};

/// Qué hacer con una línea de datos que trae menos celdas que el header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortRowPolicy {
    /// Falla con `ParseError::ShortRow` indicando línea y conteos.
    #[default]
    Reject,
    /// Completa las celdas faltantes con `""`.
    PadEmpty,
}

#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: char,
    short_rows: ShortRowPolicy,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: DEFAULT_DELIMITER,
               short_rows: ShortRowPolicy::default() }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_short_row_policy(mut self, policy: ShortRowPolicy) -> Self {
        self.short_rows = policy;
        self
    }

    /// Consume `input` completo y devuelve header + filas.
    ///
    /// El stream pasa a ser propiedad del parser y se libera al retornar,
    /// también cuando hay error a mitad de lectura.
    pub fn parse<R: Read>(&self, input: R) -> Result<Dataset, ParseError> {
        let mut lines = Lines { reader: BufReader::new(input),
                                buf: Vec::new() };

        let header_line = match lines.next() {
            None => return Err(ParseError::MissingHeader),
            Some(line) => line.map_err(|e| ParseError::Read { line: 1, message: e.to_string() })?,
        };
        let header: Vec<String> = header_line.split(self.delimiter).map(str::to_string).collect();
        let mut dataset = Dataset::new(header);

        // el header es la línea 1
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            let line = line.map_err(|e| ParseError::Read { line: line_no, message: e.to_string() })?;
            let row = self.build_row(&dataset.header, &line, line_no)?;
            trace!("line {line_no} read: {line:?} parsed to: {row:?}");
            dataset.push(row);
        }
        Ok(dataset)
    }

    pub fn parse_str(&self, input: &str) -> Result<Dataset, ParseError> {
        self.parse(input.as_bytes())
    }

    fn build_row(&self, header: &[String], line: &str, line_no: usize) -> Result<Row, ParseError> {
        let cells: Vec<&str> = line.split(self.delimiter).collect();
        if cells.len() < header.len() && self.short_rows == ShortRowPolicy::Reject {
            return Err(ParseError::ShortRow { line: line_no,
                                              expected: header.len(),
                                              actual: cells.len() });
        }

        let mut row = Row::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or_default();
            row.insert(name.clone(), cell.to_string());
        }
        Ok(row)
    }
}

/// Iterador de líneas que acepta `\n`, `\r\n` y `\r` como terminadores.
///
/// Igual que `BufRead::lines`, un terminador al final del stream no produce
/// una línea vacía extra y los bytes que no son UTF-8 dan `InvalidData`.
struct Lines<B> {
    reader: B,
    buf: Vec<u8>,
}

impl<B: BufRead> Lines<B> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let mut read_any = false;
        loop {
            let (terminator, used) = {
                let available = match self.reader.fill_buf() {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    break;
                }
                read_any = true;
                match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
                    Some(i) => {
                        self.buf.extend_from_slice(&available[..i]);
                        (Some(available[i]), i + 1)
                    }
                    None => {
                        self.buf.extend_from_slice(available);
                        (None, available.len())
                    }
                }
            };
            self.reader.consume(used);
            match terminator {
                Some(b'\r') => {
                    // `\r\n` cuenta como un solo terminador
                    if self.reader.fill_buf()?.first() == Some(&b'\n') {
                        self.reader.consume(1);
                    }
                    break;
                }
                Some(_) => break,
                None => {}
            }
        }
        if !read_any {
            return Ok(None);
        }
        String::from_utf8(std::mem::take(&mut self.buf)).map(Some)
                                                        .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }
}

impl<B: BufRead> Iterator for Lines<B> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell<'a>(row: &'a Row, key: &str) -> &'a str {
        row.get(key).map(String::as_str).unwrap_or("<missing>")
    }

    #[test]
    fn parses_header_and_rows_in_order() {
        let ds = CsvParser::new().parse_str("name,age\nAlice,30\nBob,25").expect("parse");
        assert_eq!(ds.header, vec!["name", "age"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(cell(&ds.rows[0], "name"), "Alice");
        assert_eq!(cell(&ds.rows[1], "age"), "25");
    }

    #[test]
    fn empty_stream_has_no_header() {
        assert_eq!(CsvParser::new().parse_str(""), Err(ParseError::MissingHeader));
    }

    #[test]
    fn header_only_yields_empty_dataset() {
        let ds = CsvParser::new().parse_str("a,b\n").expect("parse");
        assert!(ds.is_empty());
        assert_eq!(ds.header, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_header_later_cell_wins() {
        let ds = CsvParser::new().parse_str("a,a\n1,2").expect("parse");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].len(), 1);
        assert_eq!(cell(&ds.rows[0], "a"), "2");
    }

    #[test]
    fn short_row_is_rejected_with_line_number() {
        let err = CsvParser::new().parse_str("a,b,c\n1,2,3\n4,5").unwrap_err();
        assert_eq!(err, ParseError::ShortRow { line: 3, expected: 3, actual: 2 });
    }

    #[test]
    fn short_row_is_padded_when_requested() {
        let ds = CsvParser::new().with_short_row_policy(ShortRowPolicy::PadEmpty)
                                 .parse_str("a,b,c\n4,5")
                                 .expect("parse");
        assert_eq!(cell(&ds.rows[0], "b"), "5");
        assert_eq!(cell(&ds.rows[0], "c"), "");
    }

    #[test]
    fn extra_cells_are_ignored() {
        let ds = CsvParser::new().parse_str("a\n1,2,3").expect("parse");
        assert_eq!(ds.rows[0].len(), 1);
        assert_eq!(cell(&ds.rows[0], "a"), "1");
    }

    #[test]
    fn blank_line_with_single_column_is_an_empty_cell() {
        let ds = CsvParser::new().parse_str("only\nx\n\ny").expect("parse");
        assert_eq!(ds.len(), 3);
        assert_eq!(cell(&ds.rows[1], "only"), "");
    }

    #[test]
    fn blank_line_with_several_columns_is_a_short_row() {
        let err = CsvParser::new().parse_str("a,b\n1,2\n\n3,4").unwrap_err();
        assert_eq!(err, ParseError::ShortRow { line: 3, expected: 2, actual: 1 });
    }

    #[test]
    fn cells_are_not_trimmed_or_unquoted() {
        let ds = CsvParser::new().parse_str("a,b\n \"x\" , y").expect("parse");
        assert_eq!(cell(&ds.rows[0], "a"), " \"x\" ");
        assert_eq!(cell(&ds.rows[0], "b"), " y");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let ds = CsvParser::new().parse_str("a,b\r\n1,2\r\n").expect("parse");
        assert_eq!(ds.header, vec!["a", "b"]);
        assert_eq!(cell(&ds.rows[0], "b"), "2");
    }

    #[test]
    fn lone_cr_terminators_split_lines() {
        let ds = CsvParser::new().parse_str("name,age\rAlice,30\rBob,25").expect("parse");
        assert_eq!(ds.header, vec!["name", "age"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(cell(&ds.rows[0], "name"), "Alice");
        assert_eq!(cell(&ds.rows[1], "age"), "25");
    }

    #[test]
    fn mixed_terminators_keep_line_numbers() {
        let err = CsvParser::new().parse_str("a,b\r1,2\r\n3,4\n5").unwrap_err();
        assert_eq!(err, ParseError::ShortRow { line: 4, expected: 2, actual: 1 });
    }

    #[test]
    fn trailing_cr_does_not_add_a_row() {
        let ds = CsvParser::new().parse_str("a\r1\r").expect("parse");
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn crlf_split_across_reads_is_one_terminator() {
        let reader = (&b"a,b\r"[..]).chain(&b"\n1,2"[..]);
        let ds = CsvParser::new().parse(reader).expect("parse");
        assert_eq!(ds.header, vec!["a", "b"]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn custom_delimiter() {
        let ds = CsvParser::new().with_delimiter(';').parse_str("a;b\n1,5;2").expect("parse");
        assert_eq!(cell(&ds.rows[0], "a"), "1,5");
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let bytes: &[u8] = b"a\nok\n\xff\xfe";
        let err = CsvParser::new().parse(bytes).unwrap_err();
        assert!(matches!(err, ParseError::Read { line: 3, .. }), "got {err:?}");
    }
}
