use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::de::{self, Deserialize, Deserializer, Visitor};

/**
A specialized `Cow<'a, str>` that can be deserialized using
borrowed data.

Object keys in a log line are borrowed from the line itself unless
they contain escapes.
*/
#[derive(Debug)]
pub(super) enum Str<'a, S = String> {
    Borrowed(&'a str),
    Owned(S),
}

impl<'a, S> AsRef<str> for Str<'a, S>
where
    S: AsRef<str>,
{
    fn as_ref(&self) -> &str {
        match self {
            Str::Borrowed(s) => s,
            Str::Owned(ref s) => s.as_ref(),
        }
    }
}

impl<'a, 'b, SA, SB> PartialEq<Str<'b, SB>> for Str<'a, SA>
where
    SA: AsRef<str>,
    SB: AsRef<str>,
{
    fn eq(&self, other: &Str<'b, SB>) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<'a, S> Eq for Str<'a, S> where Str<'a, S>: PartialEq {}

impl<'a, S> Hash for Str<'a, S>
where
    S: AsRef<str>,
{
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.as_ref().hash(state)
    }
}

impl<'de: 'a, 'a, S> Deserialize<'de> for Str<'a, S>
where
    S: From<String>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringVisitor<'a, S>(std::marker::PhantomData<Str<'a, S>>);

        impl<'de: 'a, 'a, S> Visitor<'de> for StringVisitor<'a, S>
        where
            S: From<String>,
        {
            type Value = Str<'a, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Str::Owned(S::from(value.to_owned())))
            }

            fn visit_borrowed_str<E>(self, value: &'de str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Str::Borrowed(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Str::Owned(S::from(value)))
            }
        }

        deserializer.deserialize_str(StringVisitor(Default::default()))
    }
}
