use regex::Regex;

use crate::TableOptions;
use crate::driver::{DatabaseSession, DumpError};

use super::encode::escape_string;

/// 枚举目标数据库中待导出的基础表,视图除外
///
/// 返回顺序即目录查询的返回顺序,不保证跨引擎稳定,调用方不得依赖。
pub fn list_tables(
    session: &mut dyn DatabaseSession,
    database: &str,
    options: &TableOptions,
) -> Result<Vec<String>, DumpError> {
    if database.trim().is_empty() {
        return Err(DumpError::MissingField("database".into()));
    }

    let filter = TableFilter::new(options)?;
    let sql = format!(
        "SELECT TABLE_NAME FROM information_schema.tables WHERE TABLE_SCHEMA = '{}' AND TABLE_TYPE <> 'VIEW'",
        escape_string(database)
    );
    let raw = session.query_raw(&sql)?;

    let mut tables = vec![];
    for row in &raw.rows {
        let name = match row.first() {
            Some(Some(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
            _ => return Err(DumpError::ScanFailure("表名列为空".into())),
        };
        if filter.matches(&name) {
            tables.push(name);
        } else {
            tracing::debug!("表 {} 被过滤规则排除", name);
        }
    }
    Ok(tables)
}

/// 包含/排除过滤器,正则在枚举前编译一次
struct TableFilter {
    included: Vec<String>,
    excluded: Vec<String>,
    included_regex: Vec<Regex>,
    excluded_regex: Vec<Regex>,
}

impl TableFilter {
    fn new(options: &TableOptions) -> Result<Self, DumpError> {
        Ok(Self {
            included: options.included_tables.clone(),
            excluded: options.excluded_tables.clone(),
            included_regex: compile_patterns(&options.included_tables_regex)?,
            excluded_regex: compile_patterns(&options.excluded_tables_regex)?,
        })
    }

    // 排除规则优先;包含规则全部为空时默认放行
    fn matches(
        &self,
        name: &str,
    ) -> bool {
        if self.excluded.iter().any(|t| t == name) {
            return false;
        }
        if self.excluded_regex.iter().any(|re| re.is_match(name)) {
            return false;
        }
        if self.included.is_empty() && self.included_regex.is_empty() {
            return true;
        }
        self.included.iter().any(|t| t == name) || self.included_regex.iter().any(|re| re.is_match(name))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, DumpError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|err| DumpError::InvalidField(format!("表过滤正则 {}: {}", p, err))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::mock::{MockSession, raw_table, single_column};

    #[test]
    fn lists_base_tables_for_database() {
        let mut session = MockSession::new();
        session.push(Ok(single_column(&["actor", "film"])));

        let tables = list_tables(&mut session, "sakila", &TableOptions::default()).unwrap();
        assert_eq!(tables, vec!["actor".to_string(), "film".to_string()]);

        let sql = &session.executed[0];
        assert!(sql.contains("TABLE_SCHEMA = 'sakila'"));
        assert!(sql.contains("TABLE_TYPE <> 'VIEW'"));
    }

    #[test]
    fn database_name_is_required() {
        let err = list_tables(&mut MockSession::new(), "  ", &TableOptions::default()).unwrap_err();
        assert!(matches!(err, DumpError::MissingField(_)));
    }

    #[test]
    fn database_name_quotes_are_escaped() {
        let mut session = MockSession::new();
        session.push(Ok(single_column(&[])));

        list_tables(&mut session, "o'db", &TableOptions::default()).unwrap();
        assert!(session.executed[0].contains("TABLE_SCHEMA = 'o''db'"));
    }

    #[test]
    fn null_table_name_is_scan_failure() {
        let mut session = MockSession::new();
        session.push(Ok(raw_table(&[("TABLE_NAME", "VARCHAR")], &[vec![None]])));

        let err = list_tables(&mut session, "sakila", &TableOptions::default()).unwrap_err();
        assert!(matches!(err, DumpError::ScanFailure(_)));
    }

    #[test]
    fn excluded_tables_are_dropped() {
        let mut session = MockSession::new();
        session.push(Ok(single_column(&["actor", "film", "staff"])));

        let options = TableOptions {
            excluded_tables: vec!["film".into()],
            ..TableOptions::default()
        };
        let tables = list_tables(&mut session, "sakila", &options).unwrap();
        assert_eq!(tables, vec!["actor".to_string(), "staff".to_string()]);
    }

    #[test]
    fn include_regex_narrows_selection() {
        let mut session = MockSession::new();
        session.push(Ok(single_column(&["actor", "film", "film_text"])));

        let options = TableOptions {
            included_tables_regex: vec!["^film".into()],
            ..TableOptions::default()
        };
        let tables = list_tables(&mut session, "sakila", &options).unwrap();
        assert_eq!(tables, vec!["film".to_string(), "film_text".to_string()]);
    }

    #[test]
    fn exclusion_beats_inclusion() {
        let mut session = MockSession::new();
        session.push(Ok(single_column(&["film", "film_text"])));

        let options = TableOptions {
            included_tables: vec!["film".into(), "film_text".into()],
            excluded_tables_regex: vec!["_text$".into()],
            ..TableOptions::default()
        };
        let tables = list_tables(&mut session, "sakila", &options).unwrap();
        assert_eq!(tables, vec!["film".to_string()]);
    }

    #[test]
    fn invalid_pattern_is_rejected_before_querying() {
        let mut session = MockSession::new();
        let options = TableOptions {
            included_tables_regex: vec!["(".into()],
            ..TableOptions::default()
        };

        let err = list_tables(&mut session, "sakila", &options).unwrap_err();
        assert!(matches!(err, DumpError::InvalidField(_)));
        assert!(session.executed.is_empty());
    }
}
