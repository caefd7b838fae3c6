// Reference tables: WHO growth reference curves (5 to 19 years) for
// height-for-age and BMI-for-age, one table per indicator and sex.
//
// The tables are persisted as CSV next to the program so they can be
// edited by hand; the built-in values are only used to (re)create them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::TableError;
use crate::person::Sex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    HeightForAge,
    BmiForAge,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::HeightForAge, Indicator::BmiForAge];

    /// Column and file name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Indicator::HeightForAge => "height",
            Indicator::BmiForAge => "bmi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Indicator::HeightForAge => "Height",
            Indicator::BmiForAge => "BMI",
        }
    }

    pub fn unit_desc(self) -> &'static str {
        match self {
            Indicator::HeightForAge => "Height (cm)",
            Indicator::BmiForAge => "BMI (kg/m^2)",
        }
    }

    pub fn file_name(self, sex: Sex) -> String {
        format!("{}_data_{}.csv", self.prefix(), sex.plural())
    }
}

/// One reference line, e.g. the median or the +2 z-score curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub z: i8,
    pub values: Vec<f64>,
}

impl Curve {
    pub fn label(&self) -> String {
        match self.z {
            0 => "Median".to_string(),
            z if z > 0 => format!("+{}", z),
            z => z.to_string(),
        }
    }

    fn column(&self, prefix: &str) -> String {
        match self.z {
            0 => format!("{}_median", prefix),
            z if z > 0 => format!("{}_plus_{}", prefix, z),
            z => format!("{}_minus_{}", prefix, -z),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    pub indicator: Indicator,
    pub sex: Sex,
    pub ages: Vec<u8>,
    /// Sorted from the highest z-score down.
    pub curves: Vec<Curve>,
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for age {}", self.indicator.name(), self.sex.plural())
    }
}

impl ReferenceTable {
    /// The WHO values shipped with the program.
    pub fn builtin(indicator: Indicator, sex: Sex) -> Self {
        let rows: &[(i8, [f64; 15])] = match (indicator, sex) {
            (Indicator::HeightForAge, Sex::Male) => &HEIGHT_BOYS,
            (Indicator::HeightForAge, Sex::Female) => &HEIGHT_GIRLS,
            (Indicator::BmiForAge, Sex::Male) => &BMI_BOYS,
            (Indicator::BmiForAge, Sex::Female) => &BMI_GIRLS,
        };
        let mut table = ReferenceTable {
            indicator,
            sex,
            ages: (5..=19).collect(),
            curves: rows.iter().map(|(z, values)| Curve { z: *z, values: values.to_vec() }).collect(),
        };
        table.curves.sort_by(|a, b| b.z.cmp(&a.z));
        table
    }

    /// Curve values at `age`, highest z-score first. `None` when the age
    /// is not in the table or a curve stops short of it.
    pub fn at_age(&self, age: u8) -> Option<Vec<(i8, f64)>> {
        let row = self.ages.iter().position(|a| *a == age)?;
        self.curves.iter().map(|c| Some((c.z, *c.values.get(row)?))).collect()
    }

    fn header(&self) -> Vec<String> {
        let prefix = self.indicator.prefix();
        let mut header = vec!["age".to_string()];
        let mut curves: Vec<&Curve> = self.curves.iter().collect();
        curves.sort_by_key(|c| c.z);
        header.extend(curves.iter().map(|c| c.column(prefix)));
        header
    }
}

/// Parses a curve column name such as `bmi_minus_3` or `height_median`.
fn parse_column(prefix: &str, column: &str) -> Option<i8> {
    let rest = column.strip_prefix(prefix)?.strip_prefix('_')?;
    if rest == "median" {
        return Some(0);
    }
    if let Some(n) = rest.strip_prefix("plus_") {
        return n.parse::<i8>().ok().filter(|n| *n > 0);
    }
    let n = rest.strip_prefix("minus_")?.parse::<i8>().ok().filter(|n| *n > 0)?;
    Some(-n)
}

/// Directory holding the four reference CSV files.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    dir: PathBuf,
}

impl ReferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ReferenceStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, indicator: Indicator, sex: Sex) -> PathBuf {
        self.dir.join(indicator.file_name(sex))
    }

    /// Writes `table` to its file, replacing whatever was there.
    pub fn write(&self, table: &ReferenceTable) -> Result<PathBuf, TableError> {
        let path = self.path_for(table.indicator, table.sex);
        let csv_err = |source| TableError::Csv { path: path.clone(), source };

        let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
        writer.write_record(table.header()).map_err(csv_err)?;

        let mut curves: Vec<&Curve> = table.curves.iter().collect();
        curves.sort_by_key(|c| c.z);
        for (row, age) in table.ages.iter().enumerate() {
            let mut record = vec![age.to_string()];
            record.extend(curves.iter().map(|c| format!("{:?}", c.values[row])));
            writer.write_record(&record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| TableError::Io { path: path.clone(), source })?;

        debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Creates the data directory and writes the built-in tables.
    /// Existing files are left alone unless `overwrite` is set, so hand
    /// edits survive a restart. Returns the files that were written.
    pub fn ensure_tables(&self, overwrite: bool) -> Result<Vec<PathBuf>, TableError> {
        fs::create_dir_all(&self.dir).map_err(|source| TableError::Io { path: self.dir.clone(), source })?;

        let mut written = Vec::new();
        for indicator in Indicator::ALL {
            for sex in [Sex::Male, Sex::Female] {
                if !overwrite && self.path_for(indicator, sex).exists() {
                    debug!("keeping existing {}", indicator.file_name(sex));
                    continue;
                }
                written.push(self.write(&ReferenceTable::builtin(indicator, sex))?);
            }
        }
        info!("{} reference tables written to {}", written.len(), self.dir.display());
        Ok(written)
    }

    pub fn load(&self, indicator: Indicator, sex: Sex) -> Result<ReferenceTable, TableError> {
        let path = self.path_for(indicator, sex);
        let csv_err = |source| TableError::Csv { path: path.clone(), source };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let mut columns = headers.iter();
        match columns.next() {
            Some("age") => {}
            other => {
                return Err(TableError::Column { path: path.clone(), column: other.unwrap_or_default().to_string() });
            }
        }
        let mut curves = Vec::new();
        for column in columns {
            let z = parse_column(indicator.prefix(), column)
                .ok_or_else(|| TableError::Column { path: path.clone(), column: column.to_string() })?;
            curves.push(Curve { z, values: Vec::new() });
        }

        let mut ages = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let row = i + 1;
            if record.len() != headers.len() {
                return Err(TableError::Ragged { path: path.clone(), row, expected: headers.len(), actual: record.len() });
            }
            let value_err = |value: &str| TableError::Value { path: path.clone(), row, value: value.to_string() };

            ages.push(record[0].parse::<u8>().map_err(|_| value_err(&record[0]))?);
            for (curve, field) in curves.iter_mut().zip(record.iter().skip(1)) {
                let value = field.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| value_err(field))?;
                curve.values.push(value);
            }
        }
        if ages.is_empty() || curves.is_empty() {
            return Err(TableError::Empty { path });
        }

        curves.sort_by(|a, b| b.z.cmp(&a.z));
        debug!("loaded {} ({} rows)", path.display(), ages.len());
        Ok(ReferenceTable { indicator, sex, ages, curves })
    }
}

// Data by WHO, ages 5 to 19.
const HEIGHT_BOYS: [(i8, [f64; 15]); 5] = [
    (-2, [101.6, 106.7, 111.8, 116.6, 121.3, 125.8, 130.5, 135.8, 142.1, 148.7, 154.3, 158.3, 160.8, 162.1, 162.8]),
    (-1, [105.5, 110.8, 116.3, 121.4, 126.3, 131.2, 136.1, 141.7, 148.3, 155.2, 160.9, 164.8, 167.2, 168.4, 169.0]),
    (0, [110.3, 116.0, 121.7, 127.3, 132.6, 137.8, 143.1, 149.1, 156.0, 163.2, 169.0, 172.9, 175.2, 176.1, 176.5]),
    (1, [115.0, 121.1, 127.2, 133.1, 138.8, 144.4, 150.1, 156.4, 163.7, 171.2, 177.0, 181.0, 183.1, 183.9, 184.1]),
    (2, [118.9, 125.2, 131.7, 137.9, 143.9, 149.8, 155.8, 162.4, 170.0, 177.6, 183.6, 187.5, 189.5, 190.2, 190.3]),
];

const HEIGHT_GIRLS: [(i8, [f64; 15]); 5] = [
    (-2, [100.6, 105.5, 110.5, 115.7, 121.0, 126.6, 132.5, 138.4, 143.3, 146.7, 148.7, 149.8, 150.3, 150.6, 150.9]),
    (-1, [104.7, 109.8, 115.1, 120.5, 126.2, 132.0, 138.1, 144.1, 149.2, 152.6, 154.5, 155.5, 155.9, 156.2, 156.4]),
    (0, [109.6, 115.1, 120.8, 126.6, 132.5, 138.6, 145.0, 151.2, 156.4, 159.8, 161.7, 162.5, 162.9, 163.1, 163.2]),
    (1, [114.5, 120.4, 126.5, 132.6, 138.8, 145.3, 151.9, 158.3, 163.6, 167.0, 168.8, 169.6, 169.8, 169.9, 169.9]),
    (2, [118.6, 124.8, 131.1, 137.5, 144.0, 150.7, 157.5, 164.1, 169.4, 172.8, 174.6, 175.3, 175.4, 175.5, 175.5]),
];

const BMI_BOYS: [(i8, [f64; 15]); 7] = [
    (-3, [12.1, 12.1, 12.3, 12.4, 12.6, 12.8, 13.1, 13.4, 13.8, 14.3, 14.7, 15.1, 15.4, 15.7, 15.9]),
    (-2, [13.0, 13.0, 13.1, 13.3, 13.5, 13.7, 14.1, 14.5, 14.9, 15.5, 16.0, 16.5, 16.9, 17.3, 17.6]),
    (-1, [14.1, 14.1, 14.2, 14.4, 14.6, 14.9, 15.3, 15.8, 16.4, 17.0, 17.6, 18.2, 18.8, 19.2, 19.6]),
    (0, [15.3, 15.3, 15.5, 15.7, 16.0, 16.4, 16.9, 17.5, 18.2, 19.0, 19.8, 20.5, 21.1, 21.7, 22.2]),
    (1, [16.6, 16.8, 17.0, 17.4, 17.9, 18.5, 19.2, 19.9, 20.8, 21.8, 22.7, 23.5, 24.3, 24.9, 25.4]),
    (2, [18.3, 18.5, 19.0, 19.7, 20.5, 21.4, 22.5, 23.6, 24.8, 25.9, 27.0, 27.9, 28.6, 29.2, 29.7]),
    (3, [20.2, 20.7, 21.6, 22.8, 24.3, 26.1, 28.0, 30.0, 31.7, 33.1, 34.1, 34.8, 35.2, 35.4, 35.5]),
];

const BMI_GIRLS: [(i8, [f64; 15]); 7] = [
    (-3, [11.8, 11.7, 11.8, 11.9, 12.1, 12.4, 12.7, 13.2, 13.6, 14.0, 14.4, 14.6, 14.7, 14.7, 14.7]),
    (-2, [12.7, 12.7, 12.7, 12.9, 13.1, 13.5, 13.9, 14.4, 14.9, 15.4, 15.9, 16.2, 16.4, 16.4, 16.5]),
    (-1, [13.9, 13.9, 13.9, 14.1, 14.4, 14.8, 15.3, 16.0, 16.6, 17.2, 17.8, 18.2, 18.4, 18.6, 18.7]),
    (0, [15.2, 15.3, 15.4, 15.7, 16.1, 16.6, 17.2, 18.0, 18.8, 19.6, 20.2, 20.7, 21.0, 21.3, 21.4]),
    (1, [16.9, 17.0, 17.3, 17.7, 18.3, 19.0, 19.9, 20.8, 21.8, 22.7, 23.5, 24.1, 24.5, 24.8, 25.0]),
    (2, [18.9, 19.2, 19.8, 20.6, 21.5, 22.6, 23.7, 25.0, 26.2, 27.3, 28.2, 28.9, 29.3, 29.5, 29.7]),
    (3, [21.3, 22.1, 23.3, 24.8, 26.5, 28.4, 30.2, 31.9, 33.4, 34.7, 35.5, 36.1, 36.3, 36.3, 36.2]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(parse_column("bmi", "bmi_minus_3"), Some(-3));
        assert_eq!(parse_column("bmi", "bmi_plus_2"), Some(2));
        assert_eq!(parse_column("height", "height_median"), Some(0));
        assert_eq!(parse_column("height", "bmi_median"), None);
        assert_eq!(parse_column("height", "height_plus_0"), None);
        assert_eq!(parse_column("height", "height_minus_x"), None);
    }

    #[test]
    fn builtin_tables_are_complete() {
        for indicator in Indicator::ALL {
            for sex in [Sex::Male, Sex::Female] {
                let table = ReferenceTable::builtin(indicator, sex);
                assert_eq!(table.ages.first(), Some(&5));
                assert_eq!(table.ages.last(), Some(&19));
                assert!(table.curves.iter().all(|c| c.values.len() == table.ages.len()));
                assert!(table.curves.windows(2).all(|w| w[0].z > w[1].z));
            }
        }
        assert_eq!(ReferenceTable::builtin(Indicator::HeightForAge, Sex::Male).curves.len(), 5);
        assert_eq!(ReferenceTable::builtin(Indicator::BmiForAge, Sex::Female).curves.len(), 7);
    }

    #[test]
    fn header_runs_from_lowest_curve() {
        let table = ReferenceTable::builtin(Indicator::HeightForAge, Sex::Female);
        assert_eq!(
            table.header(),
            vec!["age", "height_minus_2", "height_minus_1", "height_median", "height_plus_1", "height_plus_2"]
        );
    }

    #[test]
    fn lookup_by_age() {
        let table = ReferenceTable::builtin(Indicator::BmiForAge, Sex::Male);
        let row = table.at_age(10).unwrap();
        assert_eq!(row.first(), Some(&(3, 26.1)));
        assert_eq!(row[3], (0, 16.4));
        assert!(table.at_age(20).is_none());
    }

    #[test]
    fn lookup_past_a_short_curve() {
        let table = ReferenceTable {
            indicator: Indicator::HeightForAge,
            sex: Sex::Female,
            ages: vec![5, 6, 7],
            curves: vec![
                Curve { z: 1, values: vec![114.5, 120.4, 126.5] },
                Curve { z: 0, values: vec![109.6, 115.1] },
            ],
        };
        assert_eq!(table.at_age(6), Some(vec![(1, 120.4), (0, 115.1)]));
        assert_eq!(table.at_age(7), None);
    }

    #[test]
    fn labels() {
        let curve = |z| Curve { z, values: vec![] };
        assert_eq!(curve(0).label(), "Median");
        assert_eq!(curve(2).label(), "+2");
        assert_eq!(curve(-3).label(), "-3");
    }
}
