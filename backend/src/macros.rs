//! Crate-internal macros.

/// Implement `fmt::Debug` for a struct while hiding secret fields.
///
/// Each field is prefixed with how it should be printed:
///
/// - `show field` - the value as-is
/// - `redact field` - `"[REDACTED]"`
/// - `redact_option field` - `Some("[REDACTED]")` or `None`
///
/// ```ignore
/// redacted_debug!(Config {
///     show database_url,
///     redact jwt_secret,
///     redact_option user_password,
/// });
/// ```
macro_rules! redacted_debug {
    ($name:ident { $( $kind:ident $field:ident ),* $(,)? }) => {
        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut s = f.debug_struct(stringify!($name));
                $( redacted_debug!(@field s, self, $kind, $field); )*
                s.finish_non_exhaustive()
            }
        }
    };
    (@field $s:ident, $self:ident, show, $field:ident) => {
        $s.field(stringify!($field), &$self.$field);
    };
    (@field $s:ident, $self:ident, redact, $field:ident) => {
        $s.field(stringify!($field), &"[REDACTED]");
    };
    (@field $s:ident, $self:ident, redact_option, $field:ident) => {
        $s.field(stringify!($field), &$self.$field.as_ref().map(|_| "[REDACTED]"));
    };
}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    struct Login {
        email: String,
        password: String,
        otp: Option<String>,
    }

    redacted_debug!(Login {
        show email,
        redact password,
        redact_option otp,
    });

    #[test]
    fn test_password_is_hidden() {
        let login = Login {
            email: "test@api.com".to_string(),
            password: "123-secret".to_string(),
            otp: Some("998877".to_string()),
        };
        let output = format!("{:?}", login);
        assert!(output.contains("test@api.com"));
        assert!(!output.contains("123-secret"));
        assert!(!output.contains("998877"));
        assert!(output.contains("Some(\"[REDACTED]\")"));
    }

    #[test]
    fn test_missing_optional_prints_none() {
        let login = Login {
            email: "a@b.c".to_string(),
            password: "x".to_string(),
            otp: None,
        };
        assert!(format!("{:?}", login).contains("otp: None"));
    }
}
