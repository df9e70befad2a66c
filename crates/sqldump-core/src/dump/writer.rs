use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::driver::DumpError;

/// 导出产物写入器
///
/// 互斥锁串行化全部写入;每次调用以追加模式重新打开文件,写完立即刷新再释放锁,
/// 并发调用下各段落整体落盘,互不交错。文件从不截断,重复运行会继续追加。
pub struct FileWriter {
    full_path: PathBuf,
    lock: Mutex<()>,
}

impl FileWriter {
    pub fn new(
        base_path: &str,
        file_name: &str,
    ) -> Result<Self, DumpError> {
        let dir = Path::new(base_path);
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        let full_path = dir.join(file_name);
        tracing::info!("导出文件: {}", full_path.display());

        Ok(Self {
            full_path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.full_path
    }

    /// 将一段渲染好的文本完整追加到产物末尾
    pub fn append(
        &self,
        content: &str,
    ) -> Result<(), DumpError> {
        let _guard = self.lock.lock().unwrap();

        let mut file = OpenOptions::new().create(true).append(true).open(&self.full_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn appends_accumulate_in_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().to_str().unwrap(), "out.sql").unwrap();

        writer.append("one\n").unwrap();
        writer.append("two\n").unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = FileWriter::new(nested.to_str().unwrap(), "out.sql").unwrap();

        writer.append("x").unwrap();
        assert!(nested.join("out.sql").exists());
    }

    #[test]
    fn concurrent_appends_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Arc::new(FileWriter::new(dir.path().to_str().unwrap(), "out.sql").unwrap());

        let mut handles = vec![];
        for i in 0..8 {
            let writer = Arc::clone(&writer);
            handles.push(thread::spawn(move || {
                let block = format!("-- begin {i}\nbody {i}\n-- end {i}\n");
                for _ in 0..20 {
                    writer.append(&block).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(writer.path()).unwrap();
        let mut total = 0;
        for i in 0..8 {
            let block = format!("-- begin {i}\nbody {i}\n-- end {i}\n");
            assert_eq!(content.matches(&block).count(), 20);
            total += block.len() * 20;
        }
        assert_eq!(content.len(), total);
    }
}
