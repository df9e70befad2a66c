use mysql::consts::{ColumnFlags, ColumnType};
use mysql::{Column, Conn, Opts, OptsBuilder, SslOpts, Value, prelude::Queryable};

use crate::MySQLOptions;

use super::{ColumnMeta, DatabaseDriver, DatabaseSession, DumpError, RawTable, validate_sql};

#[derive(Debug, Clone, Copy)]
pub struct MySQLDriver;

impl DatabaseDriver for MySQLDriver {
    type Config = MySQLOptions;

    fn check_connection(
        &self,
        config: &Self::Config,
    ) -> Result<(), DumpError> {
        let mut conn = open_conn(config)?;
        conn.ping()
            .map_err(|err| DumpError::ConnectionFailure(format!("ping 失败: {}", err)))?;
        Ok(())
    }

    fn create_connection(
        &self,
        config: &Self::Config,
    ) -> Result<Box<dyn DatabaseSession>, DumpError> {
        let conn = open_conn(config)?;
        Ok(Box::new(MySQLSession::new(conn)))
    }
}

struct MySQLSession {
    conn: Conn,
}

impl MySQLSession {
    fn new(conn: Conn) -> Self {
        Self { conn }
    }
}

impl DatabaseSession for MySQLSession {
    fn query_raw(
        &mut self,
        sql: &str,
    ) -> Result<RawTable, DumpError> {
        validate_sql(sql)?;
        tracing::debug!(sql = %sql);

        let result = self
            .conn
            .query_iter(sql)
            .map_err(|err| DumpError::QueryFailure(format!("执行查询失败: {}", err)))?;

        let cols: Vec<ColumnMeta> = result
            .columns()
            .as_ref()
            .iter()
            .map(|col| ColumnMeta {
                name: col.name_str().into_owned(),
                kind: type_name(col).into(),
            })
            .collect();

        let mut rows = vec![];
        for row in result {
            let row = row.map_err(|err| DumpError::ScanFailure(format!("读取行失败: {}", err)))?;
            let raw = row.unwrap();
            rows.push(raw.into_iter().map(raw_value).collect());
        }

        Ok(RawTable { cols, rows })
    }
}

fn open_conn(config: &MySQLOptions) -> Result<Conn, DumpError> {
    if config.host.trim().is_empty() {
        return Err(DumpError::MissingField("host".into()));
    }
    if config.username.trim().is_empty() {
        return Err(DumpError::MissingField("username".into()));
    }
    if config.database.trim().is_empty() {
        return Err(DumpError::MissingField("database".into()));
    }

    let mut builder = OptsBuilder::new();
    builder = builder.ip_or_hostname(Some(config.host.clone()));
    builder = builder.tcp_port(config.port.parse().unwrap_or(3306));
    builder = builder.user(Some(config.username.clone()));
    builder = builder.pass(Some(config.password.clone()));
    builder = builder.db_name(Some(config.database.clone()));

    if config.use_tls {
        builder = builder.ssl_opts(Some(SslOpts::default()));
    }
    let opts = Opts::from(builder);
    Conn::new(opts).map_err(|err| DumpError::ConnectionFailure(format!("连接失败: {}", err)))
}

fn type_name(col: &Column) -> &'static str {
    let binary = col.flags().contains(ColumnFlags::BINARY_FLAG);
    type_name_of(col.column_type(), binary)
}

// 文本协议下 TEXT/BLOB、CHAR/BINARY 等共享同一列类型编号,
// 由 BINARY 标志位区分字符与二进制
fn type_name_of(
    column_type: ColumnType,
    binary: bool,
) -> &'static str {
    match column_type {
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => "DECIMAL",
        ColumnType::MYSQL_TYPE_TINY => "TINYINT",
        ColumnType::MYSQL_TYPE_SHORT => "SMALLINT",
        ColumnType::MYSQL_TYPE_LONG => "INT",
        ColumnType::MYSQL_TYPE_INT24 => "MEDIUMINT",
        ColumnType::MYSQL_TYPE_LONGLONG => "BIGINT",
        ColumnType::MYSQL_TYPE_FLOAT => "FLOAT",
        ColumnType::MYSQL_TYPE_DOUBLE => "DOUBLE",
        ColumnType::MYSQL_TYPE_NULL => "NULL",
        ColumnType::MYSQL_TYPE_TIMESTAMP => "TIMESTAMP",
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => "DATE",
        ColumnType::MYSQL_TYPE_TIME => "TIME",
        ColumnType::MYSQL_TYPE_DATETIME => "DATETIME",
        ColumnType::MYSQL_TYPE_YEAR => "YEAR",
        ColumnType::MYSQL_TYPE_VARCHAR => "VARCHAR",
        ColumnType::MYSQL_TYPE_BIT => "BIT",
        ColumnType::MYSQL_TYPE_JSON => "JSON",
        ColumnType::MYSQL_TYPE_ENUM => "ENUM",
        ColumnType::MYSQL_TYPE_SET => "SET",
        ColumnType::MYSQL_TYPE_TINY_BLOB => {
            if binary {
                "TINYBLOB"
            } else {
                "TINYTEXT"
            }
        }
        ColumnType::MYSQL_TYPE_MEDIUM_BLOB => {
            if binary {
                "MEDIUMBLOB"
            } else {
                "MEDIUMTEXT"
            }
        }
        ColumnType::MYSQL_TYPE_LONG_BLOB => {
            if binary {
                "LONGBLOB"
            } else {
                "LONGTEXT"
            }
        }
        ColumnType::MYSQL_TYPE_BLOB => {
            if binary {
                "BLOB"
            } else {
                "TEXT"
            }
        }
        ColumnType::MYSQL_TYPE_VAR_STRING => {
            if binary {
                "VARBINARY"
            } else {
                "VARCHAR"
            }
        }
        ColumnType::MYSQL_TYPE_STRING => {
            if binary {
                "BINARY"
            } else {
                "CHAR"
            }
        }
        ColumnType::MYSQL_TYPE_GEOMETRY => "GEOMETRY",
        _ => "UNKNOWN",
    }
}

fn raw_value(value: Value) -> Option<Vec<u8>> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(bytes),
        Value::Int(int) => Some(int.to_string().into_bytes()),
        Value::UInt(uint) => Some(uint.to_string().into_bytes()),
        Value::Float(float) => Some(float.to_string().into_bytes()),
        Value::Double(double) => Some(double.to_string().into_bytes()),
        Value::Date(year, month, day, hour, minute, second, micros) => Some(
            format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}").into_bytes(),
        ),
        Value::Time(neg, days, hours, minutes, seconds, micros) => {
            let sign = if neg { "-" } else { "" };
            Some(format!("{sign}{days} {hours:02}:{minutes:02}:{seconds:02}.{micros:06}").into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use mysql::Value;
    use mysql::consts::ColumnType;

    use super::{raw_value, type_name_of};

    #[test]
    fn binary_flag_splits_text_and_blob() {
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_BLOB, true), "BLOB");
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_BLOB, false), "TEXT");
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_VAR_STRING, true), "VARBINARY");
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_VAR_STRING, false), "VARCHAR");
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_STRING, true), "BINARY");
        assert_eq!(type_name_of(ColumnType::MYSQL_TYPE_GEOMETRY, false), "GEOMETRY");
    }

    #[test]
    fn values_become_nullable_bytes() {
        assert_eq!(raw_value(Value::NULL), None);
        assert_eq!(raw_value(Value::Bytes(vec![0x01, 0xff])), Some(vec![0x01, 0xff]));
        assert_eq!(raw_value(Value::Int(-7)), Some(b"-7".to_vec()));
        assert_eq!(raw_value(Value::UInt(42)), Some(b"42".to_vec()));
    }

    #[test]
    fn date_value_keeps_sortable_format() {
        let value = Value::Date(2026, 8, 7, 9, 30, 0, 0);
        assert_eq!(raw_value(value), Some(b"2026-08-07 09:30:00.000000".to_vec()));
    }
}
