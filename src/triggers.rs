//! The eleven trigger actions. Each one performs a single operation that is
//! known to fail under the default [`DemoConfig`] and hands the failure back
//! as a [`Fault`].

use crate::config::DemoConfig;
use crate::fault::Fault;
use crate::scenario::Cleanup;
use lazy_static::lazy_static;
use rusqlite::{Connection, OpenFlags};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

// =============================================================================
// Big-endian integer streams
// =============================================================================

/// Writes fixed-width big-endian integers to a file.
pub struct DataOutput {
    writer: BufWriter<File>,
}

impl DataOutput {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }

    pub fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.writer.write_all(&value.to_be_bytes())
    }

    /// Flush buffered bytes and sync the file to disk.
    pub fn close(self) -> io::Result<()> {
        let file = self.writer.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()
    }
}

/// A readable handle that can report whether it is still usable.
pub trait StreamHandle: Read {
    fn check(&self) -> io::Result<()>;
}

impl StreamHandle for File {
    fn check(&self) -> io::Result<()> {
        self.metadata().map(|_| ())
    }
}

/// Reads fixed-width big-endian integers from a stream.
pub struct DataInput<R = File> {
    reader: BufReader<R>,
}

impl DataInput<File> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: StreamHandle> DataInput<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Fails with `UnexpectedEof` when fewer than four bytes remain.
    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Release the stream: check that the handle is still valid, then drop it.
    ///
    /// The handle is dropped before this returns, whatever the check says.
    /// Errors from the drop itself are not observable.
    pub fn close(self) -> io::Result<()> {
        let handle = self.reader.into_inner();
        let checked = handle.check();
        drop(handle);
        checked
    }
}

/// Release `input` and describe the outcome as a cleanup line.
pub fn release_stream<R: StreamHandle>(input: DataInput<R>) -> String {
    match input.close() {
        Ok(()) => "Stream released".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to release data stream");
            format!("Error releasing stream: {err}")
        }
    }
}

// =============================================================================
// Type registry
// =============================================================================

/// A value whose concrete type is only known at runtime.
pub struct Boxed {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Boxed {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: Any>(self) -> Result<T, Fault> {
        let from = self.type_name;
        self.value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Fault::InvalidCast {
                from,
                to: type_name::<T>(),
            })
    }
}

type Constructor = fn() -> Boxed;

lazy_static! {
    static ref TYPE_REGISTRY: HashMap<&'static str, Constructor> = {
        let mut types: HashMap<&'static str, Constructor> = HashMap::new();
        types.insert("std.String", || Boxed::new(String::new()));
        types.insert("std.Integer", || Boxed::new(0_i32));
        types.insert("std.Long", || Boxed::new(0_i64));
        types.insert("std.IntList", || Boxed::new(Vec::<i32>::new()));
        types
    };
}

/// Instantiate a registered type by name.
pub fn resolve_type(name: &str) -> Result<Boxed, Fault> {
    TYPE_REGISTRY
        .get(name)
        .map(|construct| construct())
        .ok_or_else(|| Fault::ClassNotFound {
            name: name.to_string(),
        })
}

/// Allocate a zeroed buffer, rejecting negative lengths.
pub fn allocate(len: i64) -> Result<Vec<i32>, Fault> {
    let len = usize::try_from(len).map_err(|_| Fault::NegativeLength(len))?;
    Ok(vec![0; len])
}

// =============================================================================
// I/O and database triggers
// =============================================================================

pub fn restricted_write(config: &DemoConfig, cleanup: &mut Cleanup) -> Result<(), Fault> {
    let _finally = cleanup.defer((), |()| "restricted-write demonstration completed".to_string());

    let path = &config.restricted_path;
    let mut file = File::create(path).map_err(|err| Fault::from_io(path, err))?;
    file.write_all(b"This will fail")
        .map_err(|err| Fault::from_io(path, err))?;
    file.sync_all().map_err(|err| Fault::from_io(path, err))
}

pub fn missing_file_read(config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let path = &config.missing_path;
    let _file = File::open(path).map_err(|err| Fault::from_io(path, err))?;
    Ok(())
}

pub fn premature_end_of_stream(config: &DemoConfig, cleanup: &mut Cleanup) -> Result<(), Fault> {
    let path = &config.data_path;

    let mut output = DataOutput::create(path).map_err(|err| Fault::from_io(path, err))?;
    output.write_i32(123).map_err(|err| Fault::from_io(path, err))?;
    output.close().map_err(|err| Fault::from_io(path, err))?;

    let input = DataInput::open(path).map_err(|err| Fault::from_io(path, err))?;
    let mut input = cleanup.defer(input, release_stream);

    let first = input.read_i32().map_err(|err| Fault::from_io(path, err))?;
    tracing::debug!(value = first, "read first integer");
    input.read_i32().map_err(|err| Fault::from_io(path, err))?;
    Ok(())
}

pub fn unreachable_database(config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let path = &config.database_path;
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE).map_err(
        |source| Fault::Database {
            path: path.clone(),
            source,
        },
    )?;
    tracing::debug!(autocommit = conn.is_autocommit(), "database unexpectedly opened");
    Ok(())
}

// =============================================================================
// Runtime triggers
// =============================================================================

pub fn missing_class_load(config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let instance = resolve_type(&config.class_name)?;
    tracing::debug!(type_name = instance.type_name(), "resolved type");
    Ok(())
}

pub fn divide_by_zero(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let result = 10_i32.checked_div(0).ok_or(Fault::DivideByZero)?;
    tracing::debug!(result, "division succeeded");
    Ok(())
}

pub fn null_dereference(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let text: Option<&str> = None;
    let len = text.map(str::len).ok_or(Fault::NullReference {
        method: "len",
        binding: "text",
    })?;
    tracing::debug!(len, "measured text");
    Ok(())
}

pub fn out_of_range_index(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let mut slots = [0_i32; 5];
    let index = slots.len();
    let len = slots.len();
    let slot = slots
        .get_mut(index)
        .ok_or(Fault::IndexOutOfBounds { index, len })?;
    *slot = 10;
    Ok(())
}

pub fn invalid_type_cast(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let value = Boxed::new(123_i32);
    let text: String = value.downcast()?;
    tracing::debug!(%text, "cast succeeded");
    Ok(())
}

pub fn negative_size_allocation(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let buffer = allocate(-1)?;
    tracing::debug!(len = buffer.len(), "allocated buffer");
    Ok(())
}

pub fn malformed_numeric_parse(_config: &DemoConfig, _cleanup: &mut Cleanup) -> Result<(), Fault> {
    let input = "abc";
    let number: i32 = input.parse().map_err(|source| Fault::NumberFormat {
        input: input.to_string(),
        source,
    })?;
    tracing::debug!(number, "parsed number");
    Ok(())
}
