use crate::driver::escape_backtick;

/// 写入文件头的导出工具版本号
pub const DUMP_VERSION: &str = env!("CARGO_PKG_VERSION");

const HEADER_TEMPLATE: &str = "-- SQL Dump {version}
-- Backup Started:\t{start_time}
-- ------------------------------------------------------
-- Server version\t{server_version}

/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET @OLD_CHARACTER_SET_RESULTS=@@CHARACTER_SET_RESULTS */;
/*!40101 SET @OLD_COLLATION_CONNECTION=@@COLLATION_CONNECTION */;
/*!40101 SET NAMES utf8 */;
/*!40103 SET @OLD_TIME_ZONE=@@TIME_ZONE */;
/*!40103 SET TIME_ZONE='+00:00' */;
/*!40014 SET @OLD_UNIQUE_CHECKS=@@UNIQUE_CHECKS, UNIQUE_CHECKS=0 */;
/*!40014 SET @OLD_FOREIGN_KEY_CHECKS=@@FOREIGN_KEY_CHECKS, FOREIGN_KEY_CHECKS=0 */;
/*!40101 SET @OLD_SQL_MODE=@@SQL_MODE, SQL_MODE='NO_AUTO_VALUE_ON_ZERO' */;
/*!40111 SET @OLD_SQL_NOTES=@@SQL_NOTES, SQL_NOTES=0 */;
";

const TABLE_SCHEMA_TEMPLATE: &str = "
DROP TABLE IF EXISTS `{name}`;
/*!40101 SET @saved_cs_client     = @@character_set_client */;
/*!40101 SET character_set_client = utf8 */;
{schema_sql};
/*!40101 SET character_set_client = @saved_cs_client */;

";

const TABLE_DATA_HEADER: &str = "--
-- Dumping data for table `{name}`
--

LOCK TABLES `{name}` WRITE;
/*!40000 ALTER TABLE `{name}` DISABLE KEYS */;
";

const TABLE_DATA_INSERT: &str = "
INSERT INTO `{name}` VALUES {values};
";

const TABLE_DATA_FOOTER: &str = "/*!40000 ALTER TABLE `{name}` ENABLE KEYS */;
UNLOCK TABLES;
";

const FOOTER_TEMPLATE: &str = "\n\n-- Backup Completed: {complete_time}\n";

/// 渲染文件头
pub fn render_header(
    version: &str,
    start_time: &str,
    server_version: &str,
) -> String {
    HEADER_TEMPLATE
        .replace("{version}", version)
        .replace("{start_time}", start_time)
        .replace("{server_version}", server_version)
}

/// 渲染单表的结构段,建表语句原样嵌入
pub fn render_table_schema(
    name: &str,
    schema_sql: &str,
) -> String {
    TABLE_SCHEMA_TEMPLATE
        .replace("{name}", &escape_backtick(name))
        .replace("{schema_sql}", schema_sql)
}

/// 渲染单表的数据段
///
/// 元组序列为空时整条 INSERT 语句省略,锁表与键开关的括号语句仍然保留。
pub fn render_table_data(
    name: &str,
    values: &str,
) -> String {
    let name = escape_backtick(name);

    let mut section = TABLE_DATA_HEADER.replace("{name}", &name);
    if !values.is_empty() {
        section.push_str(&TABLE_DATA_INSERT.replace("{name}", &name).replace("{values}", values));
    }
    section.push_str(&TABLE_DATA_FOOTER.replace("{name}", &name));
    section
}

/// 渲染文件尾
pub fn render_footer(complete_time: &str) -> String {
    FOOTER_TEMPLATE.replace("{complete_time}", complete_time)
}
