use std::sync::Mutex;

use async_trait::async_trait;
use pauta::{
    config::RosterConfig,
    roster::{grade_range, write_results},
    sheets::{CellRef, SheetStore, SheetsError},
};
use serde_json::{Value, json};

/// An in-memory sheet: serves canned rows and records every write in order.
struct MemorySheet {
    rows:   Vec<Vec<String>>,
    writes: Mutex<Vec<(String, Value)>>,
}

impl MemorySheet {
    fn new(rows: Vec<Vec<&str>>) -> Self {
        Self {
            rows:   rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_owned).collect())
                .collect(),
            writes: Mutex::new(Vec::new()),
        }
    }

    fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn fetch_range(&self, _range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        Ok(self.rows.clone())
    }

    async fn write_cell(&self, cell: CellRef, value: Value) -> Result<(), SheetsError> {
        self.writes.lock().unwrap().push((cell.to_string(), value));
        Ok(())
    }
}

fn config_for(range: &str) -> RosterConfig {
    RosterConfig::builder().range(range).build()
}

#[tokio::test]
async fn failing_average_writes_label_and_literal_zero() {
    // Grades of 6/6/6 average to 0.6 under the sheet's /30 formula, which is
    // below the 5.0 floor regardless of the 10 absences.
    let sheet = MemorySheet::new(vec![vec!["Ana", "x", "10", "6", "6", "6"]]);
    let config = config_for("engenharia_de_software!A4:F27");

    let graded = grade_range(&sheet, &config).await.unwrap();
    write_results(&sheet, &graded).await.unwrap();

    assert_eq!(
        sheet.writes(),
        vec![
            ("G4".to_owned(), json!("Reprovado por Nota")),
            ("H4".to_owned(), json!(0)),
        ]
    );
}

#[tokio::test]
async fn exam_band_row_writes_the_threshold() {
    // Out-of-range grades are passed through unguarded, so 60/60/60 puts the
    // average at 6.0, inside the make-up exam band.
    let sheet = MemorySheet::new(vec![vec!["Ana", "x", "10", "60", "60", "60"]]);
    let config = config_for("engenharia_de_software!A4:F27");

    let graded = grade_range(&sheet, &config).await.unwrap();
    write_results(&sheet, &graded).await.unwrap();

    assert_eq!(
        sheet.writes(),
        vec![
            ("G4".to_owned(), json!("Exame Final")),
            ("H4".to_owned(), json!(4.0)),
        ]
    );
}

#[tokio::test]
async fn rows_are_written_in_order_at_their_absolute_positions() {
    let sheet = MemorySheet::new(vec![
        vec!["Ana", "x", "2", "80", "80", "80"],
        vec!["Bia", "x", "20", "80", "80", "80"],
        vec!["Caio", "x", "0", "60", "60", "60"],
    ]);
    let config = config_for("turma!A10:F12");

    let graded = grade_range(&sheet, &config).await.unwrap();
    write_results(&sheet, &graded).await.unwrap();

    let writes = sheet.writes();
    let cells: Vec<&str> = writes.iter().map(|(cell, _)| cell.as_str()).collect();
    assert_eq!(cells, vec!["G10", "H10", "G11", "H11", "G12", "H12"]);

    assert_eq!(writes[0].1, json!("Aprovado"));
    assert_eq!(writes[1].1, json!(0));
    assert_eq!(writes[2].1, json!("Reprovado por Falta"));
    assert_eq!(writes[3].1, json!(0));
    assert_eq!(writes[4].1, json!("Exame Final"));
    assert_eq!(writes[5].1, json!(4.0));
}

#[tokio::test]
async fn a_malformed_cell_aborts_before_any_write() {
    let sheet = MemorySheet::new(vec![
        vec!["Ana", "x", "2", "80", "80", "80"],
        vec!["Bia", "x", "3", "seis", "80", "80"],
    ]);
    let config = config_for("turma!A4:F5");

    let err = grade_range(&sheet, &config).await.unwrap_err();
    assert!(err.to_string().contains("row 5"), "unexpected error: {err}");
    assert!(sheet.writes().is_empty());
}

#[tokio::test]
async fn custom_absence_ceiling_is_respected() {
    let sheet = MemorySheet::new(vec![vec!["Ana", "x", "3", "80", "80", "80"]]);
    let config = RosterConfig::builder()
        .range("turma!A4:F4")
        .max_absences(2u32)
        .build();

    let graded = grade_range(&sheet, &config).await.unwrap();
    write_results(&sheet, &graded).await.unwrap();

    assert_eq!(sheet.writes()[0].1, json!("Reprovado por Falta"));
}

#[tokio::test]
async fn an_empty_range_grades_and_writes_nothing() {
    let sheet = MemorySheet::new(vec![]);
    let config = config_for("turma!A4:F27");

    let graded = grade_range(&sheet, &config).await.unwrap();
    write_results(&sheet, &graded).await.unwrap();

    assert!(graded.is_empty());
    assert!(sheet.writes().is_empty());
}
