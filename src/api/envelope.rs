use serde::ser::{self, Impossible, Serialize, SerializeStruct, SerializeTupleStruct, Serializer};
use std::fmt::{self, Display};

/// Wraps a value in a single-field JSON object.
///
/// The field is named after the wrapped type: its `#[serde(rename = "..")]`
/// value if it has one, otherwise the type name. Only structs (including
/// newtype and unit structs) have a name; anything else fails to serialize.
pub struct Envelope<T: Serialize>(pub T);

impl<T> Serialize for Envelope<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let key = field_name(&self.0)
            .map_err(|_| <S::Error as ser::Error>::custom("only named structs can be enveloped"))?;

        let mut state = serializer.serialize_struct("Envelope", 1)?;
        state.serialize_field(key, &self.0)?;
        state.end()
    }
}

#[derive(Debug)]
pub struct Unnamed;

impl std::error::Error for Unnamed {}

impl Display for Unnamed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("value has no type name")
    }
}

impl ser::Error for Unnamed {
    fn custom<T: Display>(_msg: T) -> Self {
        Unnamed
    }
}

/// Get the serde name of `t`: the value of `#[serde(rename = "..")]`, or the type name.
///
/// See: https://stackoverflow.com/a/46613908/451726
pub fn field_name<T: Serialize + ?Sized>(t: &T) -> Result<&'static str, Unnamed> {
    t.serialize(TypeName)
}

type Named = Result<&'static str, Unnamed>;

macro_rules! unnamed {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Named {
                Err(Unnamed)
            }
        )*
    };
}

struct TypeName;

impl Serializer for TypeName {
    type Ok = &'static str;
    type Error = Unnamed;
    type SerializeSeq = Impossible<Self::Ok, Self::Error>;
    type SerializeTuple = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleStruct = Struct;
    type SerializeTupleVariant = Impossible<Self::Ok, Self::Error>;
    type SerializeMap = Impossible<Self::Ok, Self::Error>;
    type SerializeStruct = Struct;
    type SerializeStructVariant = Impossible<Self::Ok, Self::Error>;

    unnamed!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_none(self) -> Named {
        Err(Unnamed)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Named {
        Err(Unnamed)
    }

    fn serialize_unit(self) -> Named {
        Err(Unnamed)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Named {
        Ok(name)
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Named {
        Err(Unnamed)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, _value: &T) -> Named {
        Ok(name)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Named {
        Err(Unnamed)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Unnamed> {
        Err(Unnamed)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Unnamed> {
        Err(Unnamed)
    }

    fn serialize_tuple_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct, Unnamed> {
        Ok(Struct(name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Unnamed> {
        Err(Unnamed)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Unnamed> {
        Err(Unnamed)
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct, Unnamed> {
        Ok(Struct(name))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Unnamed> {
        Err(Unnamed)
    }
}

struct Struct(&'static str);

impl SerializeStruct for Struct {
    type Ok = &'static str;
    type Error = Unnamed;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, _value: &T) -> Result<(), Unnamed> {
        Ok(())
    }

    fn end(self) -> Named {
        Ok(self.0)
    }
}

impl SerializeTupleStruct for Struct {
    type Ok = &'static str;
    type Error = Unnamed;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Unnamed> {
        Ok(())
    }

    fn end(self) -> Named {
        Ok(self.0)
    }
}
