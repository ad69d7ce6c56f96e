//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! decode_error {
    ($fmt:expr) => {
        return Err($crate::error::Error::Decode(format!($fmt)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::Decode(format!($fmt, $($arg)+)))
    };
}

macro_rules! encode_error {
    ($fmt:expr) => {
        return Err($crate::error::Error::Encode(format!($fmt)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::Encode(format!($fmt, $($arg)+)))
    };
}

//===========================================================================//
