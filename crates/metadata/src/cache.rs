use crate::error::{ErrorKind, Result};
use crate::observer::{MetadataObserver, Operation, ParseFailure, TracingObserver};
use exn::ResultExt;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::panic::Location;
use std::sync::Arc;

const EMPTY_OBJECT: &[u8] = b"{}";
/// Newtype name that makes `serde_json` hand over a value's raw text (the
/// protocol behind [`RawValue`]): it visits a single-entry map keyed by this
/// name, whose value is the raw JSON as a string.
const RAW_VALUE_TOKEN: &str = "$serde_json::private::RawValue";

/// Whichever variant is active is the single source of truth when serializing.
#[derive(Clone, Debug, PartialEq)]
enum State {
    Empty,
    /// Bytes as received, not yet parsed.
    RawOnly(Raw),
    /// `dirty` is set once the map has diverged from the bytes it was parsed from.
    Parsed { map: Map<String, Value>, dirty: bool },
}
impl State {
    fn from_bytes(raw: &[u8]) -> Self {
        if is_absent(raw) { Self::Empty } else { Self::RawOnly(Raw::from_bytes(raw)) }
    }
}

/// Stored bytes, checked for well-formedness once when they are stored.
#[derive(Clone, Debug)]
enum Raw {
    Json(Box<RawValue>),
    /// Kept so that reads and writes can still report what was wrong with it.
    Malformed(Vec<u8>),
}
impl Raw {
    fn from_bytes(raw: &[u8]) -> Self {
        match std::str::from_utf8(raw).ok().and_then(|s| RawValue::from_string(s.to_string()).ok()) {
            Some(json) => Self::Json(json),
            None => Self::Malformed(raw.to_vec()),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Json(json) => json.get().as_bytes(),
            Self::Malformed(raw) => raw,
        }
    }
}
impl PartialEq for Raw {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

fn is_absent(raw: &[u8]) -> bool {
    let trimmed = raw.trim_ascii();
    trimmed.is_empty() || trimmed == b"null"
}

/// Schema-less JSON object metadata attached to a larger record (contacts,
/// notes, businesses).
///
/// Bytes decoded from the wire are held as-is and only parsed on the first
/// key-level [`get`](Self::get) or [`set`](Self::set). A record that merely
/// passes its metadata through re-serializes the original bytes untouched,
/// preserving unknown keys, field order and formatting, and never pays the
/// cost of building a map. Bytes given to [`from_bytes`](Self::from_bytes) or
/// [`replace_raw`](Self::replace_raw) are syntax-checked once on the way in
/// (whitespace around the value is not kept), so serializing them later is a
/// plain copy.
///
/// Malformed bytes never fail the caller: reads come back empty, writes are
/// dropped, serialization falls back to `{}`, and each failure is reported to
/// the attached [`MetadataObserver`] (by default, [`TracingObserver`]).
///
/// Any `serde` deserializer can produce one. With `serde_json` reading
/// directly from the input the raw text is captured; when `serde` buffers the
/// input first (`#[serde(flatten)]`, internally tagged enums, other formats)
/// the value arrives already decoded and is held as an unmodified map.
///
/// Mutation takes `&mut self`; sharing one across threads needs external
/// synchronization such as a `Mutex` around the owning record.
///
/// ```
/// use wabaman_metadata::CachedMetadata;
///
/// let mut metadata = CachedMetadata::from_bytes(r#"{"erp_id": 42}"#);
/// assert_eq!(metadata.get("erp_id"), Some(&42.into()));
///
/// metadata.set("vip", true);
/// assert_eq!(metadata.to_bytes(), br#"{"erp_id":42,"vip":true}"#);
/// ```
#[derive(Clone)]
pub struct CachedMetadata {
    state: State,
    observer: Option<Arc<dyn MetadataObserver>>,
}

impl Default for CachedMetadata {
    fn default() -> Self {
        Self { state: State::Empty, observer: None }
    }
}

impl Debug for CachedMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CachedMetadata")
            .field("state", &self.state)
            .field("observer", &if self.observer.is_some() { "custom" } else { "tracing" })
            .finish()
    }
}

impl From<Map<String, Value>> for CachedMetadata {
    /// Freshly constructed metadata is authoritative from the start.
    fn from(map: Map<String, Value>) -> Self {
        Self {
            state: State::Parsed { map, dirty: true },
            observer: None,
        }
    }
}

impl CachedMetadata {
    /// Stores a private copy of `raw` without parsing it into a map.
    ///
    /// Empty input, or a literal `null`, results in empty metadata.
    pub fn from_bytes(raw: impl AsRef<[u8]>) -> Self {
        Self {
            state: State::from_bytes(raw.as_ref()),
            observer: None,
        }
    }

    /// Metadata decoded by something other than `serde_json`'s raw capture.
    fn from_value(value: Value) -> Self {
        let state = match value {
            Value::Null => State::Empty,
            Value::Object(map) => State::Parsed { map, dirty: false },
            // Not an object, but still valid JSON to pass through; reads and writes report it.
            other => match RawValue::from_string(other.to_string()) {
                Ok(json) => State::RawOnly(Raw::Json(json)),
                Err(_) => State::Empty,
            },
        };
        Self { state, observer: None }
    }

    /// Replaces the default [`TracingObserver`] for parse failure reports.
    pub fn with_observer(mut self, observer: Arc<dyn MetadataObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replaces the stored value with a copy of freshly received bytes.
    ///
    /// A literal `null` (or nothing at all) means "no change" and leaves the
    /// current value, including any unsaved modifications, in place.
    pub fn replace_raw(&mut self, raw: impl AsRef<[u8]>) {
        let raw = raw.as_ref();
        if is_absent(raw) {
            return;
        }
        self.state = State::RawOnly(Raw::from_bytes(raw));
    }

    /// `true` when there is no metadata at all (neither bytes nor a map).
    pub fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    /// Looks up a single key, parsing the stored bytes on first access.
    ///
    /// Returns `None` when the key is missing, or when the stored bytes are not
    /// a JSON object; the latter is reported to the observer with the caller's
    /// location and the stored bytes are kept for the next attempt.
    #[track_caller]
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        let location = Location::caller();
        self.parsed(Operation::Get, location).and_then(|(map, _)| map.get(key))
    }

    /// Inserts or overwrites a single key, marking the map as authoritative.
    ///
    /// If the stored bytes cannot be parsed the write is dropped (and reported),
    /// so that unparseable data is never replaced by a partial object.
    #[track_caller]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let location = Location::caller();
        if let State::Empty = self.state {
            self.state = State::Parsed { map: Map::new(), dirty: true };
        }
        if let Some((map, dirty)) = self.parsed(Operation::Set, location) {
            map.insert(key.into(), value.into());
            *dirty = true;
        }
    }

    /// Serializes the metadata, which is always a JSON value and never `null`.
    ///
    /// - Empty metadata serializes as `{}`.
    /// - Unparsed bytes are returned as stored. Malformed bytes are reported
    ///   and replaced by `{}`.
    /// - Parsed metadata serializes the map.
    #[track_caller]
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.state {
            State::Empty => EMPTY_OBJECT.to_vec(),
            State::RawOnly(Raw::Json(json)) => json.get().as_bytes().to_vec(),
            State::RawOnly(Raw::Malformed(raw)) => {
                self.report_malformed(Operation::Serialize, Some(Location::caller()), raw);
                EMPTY_OBJECT.to_vec()
            },
            // Serializing a string-keyed map of JSON values cannot fail.
            State::Parsed { map, .. } => serde_json::to_vec(map).unwrap_or_else(|_| EMPTY_OBJECT.to_vec()),
        }
    }

    /// Decodes the whole metadata object into a typed target.
    ///
    /// Returns `Ok(None)` for empty metadata. Unmodified metadata is decoded
    /// straight from the received bytes; modified metadata from the map.
    pub fn decode_into<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.state {
            State::Empty => Ok(None),
            State::RawOnly(raw) => serde_json::from_slice(raw.as_bytes())
                .map(Some)
                .or_raise(|| ErrorKind::InvalidData),
            State::Parsed { map, .. } => serde_json::from_value(Value::Object(map.clone()))
                .map(Some)
                .or_raise(|| ErrorKind::InvalidData),
        }
    }

    /// Makes sure the map is available, transitioning from raw bytes if needed.
    ///
    /// On failure the state is left untouched.
    fn parsed(
        &mut self,
        operation: Operation,
        location: &'static Location<'static>,
    ) -> Option<(&mut Map<String, Value>, &mut bool)> {
        if let State::RawOnly(raw) = &self.state {
            let map = match serde_json::from_slice::<Map<String, Value>>(raw.as_bytes()) {
                Ok(map) => map,
                Err(error) => {
                    self.report(operation, &error, Some(location), raw.as_bytes());
                    return None;
                },
            };
            tracing::debug!(%operation, keys = map.len(), "Parsed cached metadata");
            self.state = State::Parsed { map, dirty: false };
        }
        match &mut self.state {
            State::Parsed { map, dirty } => Some((map, dirty)),
            _ => None,
        }
    }

    /// Reports bytes already known to be malformed, recovering the syntax error.
    fn report_malformed(&self, operation: Operation, location: Option<&'static Location<'static>>, raw: &[u8]) {
        if let Err(error) = serde_json::from_slice::<&RawValue>(raw) {
            self.report(operation, &error, location, raw);
        }
    }

    fn report(
        &self,
        operation: Operation,
        error: &serde_json::Error,
        location: Option<&'static Location<'static>>,
        raw: &[u8],
    ) {
        let failure = ParseFailure { operation, error, location, raw };
        match &self.observer {
            Some(observer) => observer.parse_failed(&failure),
            None => TracingObserver.parse_failed(&failure),
        }
    }
}

impl Serialize for CachedMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.state {
            State::Empty => serializer.serialize_map(Some(0))?.end(),
            State::RawOnly(Raw::Json(json)) => json.serialize(serializer),
            State::RawOnly(Raw::Malformed(raw)) => {
                // Driven by `serde`, so there is no caller location to report.
                self.report_malformed(Operation::Serialize, None, raw);
                serializer.serialize_map(Some(0))?.end()
            },
            State::Parsed { map, .. } => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CachedMetadata {
    /// Captures the value's raw text when `serde_json` offers it, otherwise
    /// accepts any decoded value. A JSON `null` decodes as empty metadata.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(RAW_VALUE_TOKEN, MetadataVisitor)
    }
}

struct MetadataVisitor;
impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = CachedMetadata;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a JSON object")
    }

    /// Buffered input (`flatten`, internally tagged enums) and most other formats.
    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error> {
        Value::deserialize(deserializer).map(CachedMetadata::from_value)
    }

    /// `serde_json`'s raw capture, or a deserializer handing over a plain map.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let Some(key) = access.next_key::<String>()? else {
            return Ok(CachedMetadata::from_value(Value::Object(Map::new())));
        };
        if key == RAW_VALUE_TOKEN {
            let raw: String = access.next_value()?;
            return Ok(CachedMetadata::from_bytes(raw));
        }
        let mut map = Map::new();
        map.insert(key, access.next_value()?);
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(CachedMetadata::from_value(Value::Object(map)))
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(CachedMetadata::default())
    }

    fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(CachedMetadata::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Operation, Option<(&'static str, u32)>)>>);
    impl MetadataObserver for Recorder {
        fn parse_failed(&self, failure: &ParseFailure<'_>) {
            let location = failure.location.map(|l| (l.file(), l.line()));
            self.0.lock().unwrap().push((failure.operation, location));
        }
    }
    impl Recorder {
        fn operations(&self) -> Vec<Operation> {
            self.0.lock().unwrap().iter().map(|(op, _)| *op).collect()
        }
    }

    fn observed(raw: &str) -> (CachedMetadata, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (CachedMetadata::from_bytes(raw).with_observer(recorder.clone()), recorder)
    }

    #[derive(Serialize, Deserialize)]
    struct Contact {
        name: String,
        #[serde(default)]
        metadata: CachedMetadata,
    }

    #[rstest]
    #[case(r#"{"b":1,"a":2}"#)]
    #[case(r#"{ "nested": {"deep": [1, 2, {"x": null}]},  "unknown": "kept" }"#)]
    #[case("{}")]
    fn test_pass_through_is_byte_identical(#[case] raw: &str) {
        let metadata = CachedMetadata::from_bytes(raw);
        assert!(matches!(metadata.state, State::RawOnly(_)));
        assert_eq!(metadata.to_bytes(), raw.as_bytes());
    }

    #[rstest]
    #[case("")]
    #[case("null")]
    #[case("  null\n")]
    fn test_absent_bytes_are_empty(#[case] raw: &str) {
        let metadata = CachedMetadata::from_bytes(raw);
        assert!(metadata.is_empty());
        assert_eq!(metadata.to_bytes(), b"{}");
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "{}");
    }

    #[test]
    fn test_is_empty() {
        assert!(CachedMetadata::default().is_empty());
        assert!(!CachedMetadata::from_bytes("{}").is_empty());
        assert!(!CachedMetadata::from(Map::new()).is_empty());

        let mut metadata = CachedMetadata::default();
        metadata.set("a", 1);
        assert!(!metadata.is_empty());
    }

    #[test]
    fn test_get_parses_lazily() {
        let mut metadata = CachedMetadata::from_bytes(r#"{"store": "Centro", "tier": 2}"#);
        assert_eq!(metadata.get("store"), Some(&json!("Centro")));
        assert!(matches!(metadata.state, State::Parsed { dirty: false, .. }));
        assert_eq!(metadata.get("tier"), Some(&json!(2)));
        assert_eq!(metadata.get("missing"), None);
    }

    #[test]
    fn test_get_on_empty_is_absent() {
        let mut metadata = CachedMetadata::default();
        assert_eq!(metadata.get("anything"), None);
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut metadata = CachedMetadata::from_bytes(r#"{"a": 1}"#);
        metadata.set("b", json!({"nested": [true]}));
        assert_eq!(metadata.get("b"), Some(&json!({"nested": [true]})));
        metadata.set("a", "overwritten");
        assert_eq!(metadata.get("a"), Some(&json!("overwritten")));
    }

    #[test]
    fn test_set_is_always_serialized() {
        let mut metadata = CachedMetadata::from_bytes(r#"{"z": 0, "a": 1}"#);
        metadata.set("m", 5);
        assert_eq!(metadata.to_bytes(), br#"{"z":0,"a":1,"m":5}"#);
        // Reading afterwards must not revert to the original bytes.
        metadata.get("z");
        assert_eq!(metadata.to_bytes(), br#"{"z":0,"a":1,"m":5}"#);
        assert_eq!(serde_json::to_value(&metadata).unwrap(), json!({"z": 0, "a": 1, "m": 5}));
    }

    #[test]
    fn test_set_on_empty_creates_object() {
        let mut metadata = CachedMetadata::from_bytes("");
        metadata.set("first", 1);
        assert_eq!(metadata.to_bytes(), br#"{"first":1}"#);
    }

    #[test]
    fn test_clean_parse_serializes_equivalently() {
        let mut metadata = CachedMetadata::from_bytes(r#"{ "b": 1, "a": 2 }"#);
        metadata.get("a");
        assert_eq!(metadata.to_bytes(), br#"{"b":1,"a":2}"#);
    }

    #[rstest]
    #[case("{not json")]
    #[case("[1, 2, 3]")]
    #[case("\"just a string\"")]
    fn test_get_on_malformed_is_absent(#[case] raw: &str) {
        let (mut metadata, recorder) = observed(raw);
        assert_eq!(metadata.get("a"), None);
        assert_eq!(metadata.state, State::RawOnly(Raw::from_bytes(raw.as_bytes())));
        assert_eq!(recorder.operations(), vec![Operation::Get]);
    }

    #[test]
    fn test_set_on_malformed_is_dropped() {
        let (mut metadata, recorder) = observed("{not json");
        metadata.set("a", 1);
        assert_eq!(metadata.state, State::RawOnly(Raw::Malformed(b"{not json".to_vec())));
        assert_eq!(recorder.operations(), vec![Operation::Set]);
    }

    #[test]
    fn test_failure_reports_caller_location() {
        let (mut metadata, recorder) = observed("{not json");
        let line = line!() + 1;
        metadata.get("a");
        let reports = recorder.0.lock().unwrap();
        assert_eq!(reports.len(), 1);
        let (file, reported_line) = reports[0].1.unwrap();
        assert!(file.ends_with("cache.rs"));
        assert_eq!(reported_line, line);
    }

    #[test]
    fn test_malformed_still_serializes_valid_json() {
        let (metadata, recorder) = observed("{not json");
        let line = line!() + 1;
        assert_eq!(metadata.to_bytes(), b"{}");
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "{}");

        let reports = recorder.0.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].0, Operation::Serialize);
        assert_eq!(reports[0].1.map(|(_, l)| l), Some(line));
        // Serialization through `serde` has no caller to point at.
        assert_eq!(reports[1], (Operation::Serialize, None));
    }

    #[rstest]
    #[case(r#"{"a": 1}"#, true)]
    #[case("[1,2]", true)]
    #[case("{not json", false)]
    #[case("{\"a\": 1} trailing", false)]
    fn test_bytes_are_checked_once_when_stored(#[case] raw: &str, #[case] well_formed: bool) {
        let metadata = CachedMetadata::from_bytes(raw);
        match &metadata.state {
            State::RawOnly(Raw::Json(json)) => assert!(well_formed, "stored as JSON: {}", json.get()),
            State::RawOnly(Raw::Malformed(_)) => assert!(!well_formed),
            state => panic!("unexpected state: {state:?}"),
        }
    }

    #[test]
    fn test_non_utf8_bytes_are_malformed() {
        let (mut metadata, recorder) = {
            let recorder = Arc::new(Recorder::default());
            (CachedMetadata::from_bytes(b"{\"a\": \"\xff\"}").with_observer(recorder.clone()), recorder)
        };
        assert!(matches!(metadata.state, State::RawOnly(Raw::Malformed(_))));
        assert_eq!(metadata.get("a"), None);
        assert_eq!(metadata.to_bytes(), b"{}");
        assert_eq!(recorder.operations(), vec![Operation::Get, Operation::Serialize]);
    }

    #[test]
    fn test_surrounding_whitespace_is_not_kept() {
        let metadata = CachedMetadata::from_bytes(" {\"a\": 1}\n");
        assert_eq!(metadata.to_bytes(), br#"{"a": 1}"#);
    }

    #[test]
    fn test_non_object_pass_through() {
        let metadata = CachedMetadata::from_bytes("[1,2]");
        assert_eq!(metadata.to_bytes(), b"[1,2]");
    }

    #[test]
    fn test_replace_raw() {
        let mut metadata = CachedMetadata::default();
        metadata.set("local", true);
        metadata.replace_raw("null");
        assert_eq!(metadata.to_bytes(), br#"{"local":true}"#);

        metadata.replace_raw(r#"{"remote": 1}"#);
        assert_eq!(metadata.to_bytes(), br#"{"remote": 1}"#);
        assert_eq!(metadata.get("local"), None);
    }

    #[test]
    fn test_embedded_round_trip_preserves_bytes() {
        let input = r#"{"name":"Ana","metadata":{"z": 1,"a": {"k": "v"}}}"#;
        let contact: Contact = serde_json::from_str(input).unwrap();
        assert_eq!(contact.metadata.to_bytes(), br#"{"z": 1,"a": {"k": "v"}}"#);
        assert_eq!(serde_json::to_string(&contact).unwrap(), input);
    }

    #[rstest]
    #[case(r#"{"name":"Ana","metadata":null}"#)]
    #[case(r#"{"name":"Ana"}"#)]
    fn test_embedded_absent_is_never_null(#[case] input: &str) {
        let mut contact: Contact = serde_json::from_str(input).unwrap();
        assert!(contact.metadata.is_empty());
        assert_eq!(serde_json::to_string(&contact).unwrap(), r#"{"name":"Ana","metadata":{}}"#);

        contact.metadata.set("source", "erp");
        assert_eq!(serde_json::to_string(&contact).unwrap(), r#"{"name":"Ana","metadata":{"source":"erp"}}"#);
    }

    #[derive(Serialize, Deserialize)]
    struct Flattened {
        id: u32,
        #[serde(flatten)]
        contact: Contact,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(tag = "type")]
    enum Envelope {
        Contact(Contact),
    }

    #[rstest]
    #[case(r#"{"id":1,"name":"Ana","metadata":{"a":1,"nested":{"b":[true]}}}"#, Some(json!(1)), r#"{"a":1,"nested":{"b":[true]}}"#)]
    #[case(r#"{"id":1,"name":"Ana","metadata":null}"#, None, "{}")]
    #[case(r#"{"id":1,"name":"Ana"}"#, None, "{}")]
    fn test_flattened_record(#[case] input: &str, #[case] expected: Option<Value>, #[case] serialized: &str) {
        let mut record: Flattened = serde_json::from_str(input).unwrap();
        assert_eq!(record.contact.metadata.get("a").cloned(), expected);
        assert_eq!(record.contact.metadata.to_bytes(), serialized.as_bytes());
    }

    #[rstest]
    #[case(r#"{"type":"Contact","name":"Ana","metadata":{"a":1}}"#, Some(json!(1)))]
    #[case(r#"{"type":"Contact","name":"Ana","metadata":null}"#, None)]
    fn test_internally_tagged_envelope(#[case] input: &str, #[case] expected: Option<Value>) {
        let Envelope::Contact(mut contact) = serde_json::from_str::<Envelope>(input).unwrap();
        assert_eq!(contact.metadata.get("a").cloned(), expected);

        contact.metadata.set("b", 2);
        let output = serde_json::to_value(Envelope::Contact(contact)).unwrap();
        assert_eq!(output["metadata"]["b"], json!(2));
        assert_eq!(output["type"], json!("Contact"));
    }

    #[test]
    fn test_decoded_from_value() {
        let contact: Contact = serde_json::from_value(json!({"name": "Ana", "metadata": {"z": 1, "a": 2}})).unwrap();
        assert_eq!(contact.metadata.to_bytes(), br#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_buffered_non_object_passes_through() {
        let record: Flattened = serde_json::from_str(r#"{"id":1,"name":"Ana","metadata":[1,2]}"#).unwrap();
        assert_eq!(record.contact.metadata.to_bytes(), b"[1,2]");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Erp {
        erp_id: u64,
        #[serde(default)]
        vip: bool,
    }

    #[test]
    fn test_decode_into() {
        let mut metadata = CachedMetadata::from_bytes(r#"{"erp_id": 7, "other": "ignored"}"#);
        assert_eq!(metadata.decode_into::<Erp>().unwrap(), Some(Erp { erp_id: 7, vip: false }));

        metadata.set("vip", true);
        assert_eq!(metadata.decode_into::<Erp>().unwrap(), Some(Erp { erp_id: 7, vip: true }));

        assert_eq!(CachedMetadata::default().decode_into::<Erp>().unwrap(), None);
    }

    #[test]
    fn test_decode_into_wrong_shape() {
        let metadata = CachedMetadata::from_bytes(r#"{"erp_id": "seven"}"#);
        let err = metadata.decode_into::<Erp>().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData);
    }
}
