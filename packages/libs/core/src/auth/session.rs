//! 세션 쿠키 판정

/// 세션 쿠키 이름 (HTTPS 배포, 우선)
pub const SECURE_SESSION_COOKIE: &str = "__Secure-authjs.session-token";

/// 세션 쿠키 이름 (HTTP 배포, fallback)
pub const SESSION_COOKIE: &str = "authjs.session-token";

/// `Cookie` 헤더 값에서 쿠키 하나 추출
///
/// `name=value` 쌍을 `;`로 구분합니다. `=`가 없는 조각은 건너뜁니다.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

/// 세션 게이트
///
/// 세션 쿠키가 비어 있지 않으면 로그인 상태로 봅니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGate;

impl SessionGate {
    /// 세션 토큰 추출
    ///
    /// # 추출 우선순위
    /// 1. `__Secure-authjs.session-token`
    /// 2. `authjs.session-token`
    ///
    /// `Cookie` 헤더가 여러 개면 모두 확인합니다.
    pub fn session_token<'a, I>(cookie_headers: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let headers = cookie_headers.into_iter();
        [SECURE_SESSION_COOKIE, SESSION_COOKIE]
            .into_iter()
            .find_map(|name| {
                headers
                    .clone()
                    .filter_map(|header| cookie_value(header, name))
                    .find(|value| !value.is_empty())
            })
    }

    /// 로그인 상태 여부
    pub fn is_logged_in<'a, I>(cookie_headers: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        Self::session_token(cookie_headers).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; authjs.session-token=abc123 ; lang=ko";
        assert_eq!(cookie_value(header, "authjs.session-token"), Some("abc123"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);

        // 잘못된 조각은 무시
        assert_eq!(cookie_value("garbage; a=1", "a"), Some("1"));
    }

    #[test]
    fn test_secure_cookie_preferred() {
        let header = "authjs.session-token=plain; __Secure-authjs.session-token=secure";
        assert_eq!(SessionGate::session_token([header]), Some("secure"));

        let header = "authjs.session-token=plain";
        assert_eq!(SessionGate::session_token([header]), Some("plain"));
    }

    #[test]
    fn test_empty_value_is_anonymous() {
        assert!(!SessionGate::is_logged_in(["authjs.session-token="]));
        assert!(!SessionGate::is_logged_in(["__Secure-authjs.session-token=\"\""]));
        assert!(!SessionGate::is_logged_in(std::iter::empty::<&str>()));

        // 비어 있는 secure 쿠키는 plain 쿠키로 fallback
        let header = "__Secure-authjs.session-token=; authjs.session-token=tok";
        assert_eq!(SessionGate::session_token([header]), Some("tok"));
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let headers = ["theme=dark", "authjs.session-token=tok"];
        assert_eq!(SessionGate::session_token(headers), Some("tok"));
    }
}
