use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analyzers::MonthlyAggregate;
use crate::error::Result;
use crate::models::ObservationField;
use crate::utils::constants::{MONTH_LABELS, YEAR_COLORS};

/// How a panel reduces a month of daily values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyReduction {
    Mean,
    Sum,
}

/// One year's line in a panel; months without data are `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSeries {
    pub year: i32,
    pub color: Option<&'static str>,
    pub values: [Option<f64>; 12],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub field: ObservationField,
    pub title: String,
    pub units: &'static str,
    pub reduction: MonthlyReduction,
    pub series: Vec<YearSeries>,
}

/// Month-by-month comparison of every year in the cleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub months: [&'static str; 12],
    pub panels: Vec<ChartPanel>,
}

impl ComparisonChart {
    pub fn from_monthly(monthly: &[MonthlyAggregate]) -> Self {
        let panels = ObservationField::ALL
            .iter()
            .map(|field| build_panel(*field, monthly))
            .collect();

        Self {
            months: MONTH_LABELS,
            panels,
        }
    }

    pub fn panel(&self, field: ObservationField) -> Option<&ChartPanel> {
        self.panels.iter().find(|p| p.field == field)
    }
}

pub fn year_color(year: i32) -> Option<&'static str> {
    YEAR_COLORS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, color)| *color)
}

fn build_panel(field: ObservationField, monthly: &[MonthlyAggregate]) -> ChartPanel {
    let reduction = match field {
        ObservationField::Precipitation => MonthlyReduction::Sum,
        _ => MonthlyReduction::Mean,
    };

    let mut by_year: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();
    for aggregate in monthly {
        let stats = match field {
            ObservationField::Tmax => &aggregate.tmax,
            ObservationField::Tmin => &aggregate.tmin,
            ObservationField::Humidity => &aggregate.humidity,
            ObservationField::Precipitation => &aggregate.precipitation,
        };
        let value = match reduction {
            MonthlyReduction::Mean => stats.mean,
            MonthlyReduction::Sum => stats.sum,
        };

        let slot = (aggregate.month as usize).saturating_sub(1);
        if let Some(cell) = by_year.entry(aggregate.year).or_insert([None; 12]).get_mut(slot) {
            *cell = Some(value);
        }
    }

    let title = match reduction {
        MonthlyReduction::Mean => format!("Monthly mean {}", field.display_name().to_lowercase()),
        MonthlyReduction::Sum => format!("Monthly total {}", field.display_name().to_lowercase()),
    };

    ChartPanel {
        field,
        title,
        units: field.units(),
        reduction,
        series: by_year
            .into_iter()
            .map(|(year, values)| YearSeries {
                year,
                color: year_color(year),
                values,
            })
            .collect(),
    }
}

/// Persists comparison charts as JSON for an external renderer
pub struct ChartWriter {
    pretty: bool,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn write_chart(&self, chart: &ComparisonChart, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_chart_to(chart, BufWriter::new(file))
    }

    pub fn write_chart_to<W: Write>(&self, chart: &ComparisonChart, mut out: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, chart)?;
        } else {
            serde_json::to_writer(&mut out, chart)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::StationAnalyzer;
    use crate::models::CanonicalObservation;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn monthly() -> Vec<MonthlyAggregate> {
        let obs = |y, m, d, tmax, pp| {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            CanonicalObservation::new(0, date, tmax, 15.0, 70.0, pp)
        };
        StationAnalyzer::new().monthly(&[
            obs(2017, 12, 31, 25.0, 0.0),
            obs(2018, 1, 1, 30.0, 1.0),
            obs(2018, 1, 2, 32.0, 2.5),
            obs(2018, 3, 1, 28.0, 0.0),
        ])
    }

    #[test]
    fn test_panels_and_series() {
        let chart = ComparisonChart::from_monthly(&monthly());

        assert_eq!(chart.panels.len(), 4);
        assert_eq!(chart.months[0], "Ene");
        assert_eq!(chart.months[11], "Dic");

        let tmax = chart.panel(ObservationField::Tmax).unwrap();
        let years: Vec<i32> = tmax.series.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2017, 2018]);

        let y2018 = &tmax.series[1];
        assert_eq!(y2018.values[0], Some(31.0));
        assert_eq!(y2018.values[1], None);
        assert_eq!(y2018.values[2], Some(28.0));

        let precipitation = chart.panel(ObservationField::Precipitation).unwrap();
        assert_eq!(precipitation.reduction, MonthlyReduction::Sum);
        assert_eq!(precipitation.series[1].values[0], Some(3.5));
    }

    #[test]
    fn test_year_colors() {
        let chart = ComparisonChart::from_monthly(&monthly());
        let series = &chart.panels[0].series;

        assert_eq!(series[0].color, None);
        assert_eq!(series[1].color, Some("#1f77b4"));
        assert_eq!(year_color(2026), Some("#bcbd22"));
        assert_eq!(year_color(2027), None);
    }

    #[test]
    fn test_json_output() -> Result<()> {
        let chart = ComparisonChart::from_monthly(&monthly());
        let mut out = Vec::new();
        ChartWriter::compact().write_chart_to(&chart, &mut out)?;

        let json: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(json["months"][3], "Abr");
        assert_eq!(json["panels"][0]["field"], "tmax");
        assert_eq!(json["panels"][0]["series"][1]["values"][1], serde_json::Value::Null);
        assert_eq!(json["panels"][3]["reduction"], "sum");
        Ok(())
    }
}
