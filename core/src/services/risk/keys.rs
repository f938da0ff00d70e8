//! Cache key layout for the ephemeral risk counters

pub fn fail_ip(ip: &str) -> String {
    format!("auth:fail:ip:{}", ip)
}

pub fn fail_ip_phone(ip: &str, phone: &str) -> String {
    format!("auth:fail:ip_phone:{}:{}", ip, phone)
}

pub fn lock_ip(ip: &str) -> String {
    format!("auth:lock:ip:{}", ip)
}

pub fn lock_ip_phone(ip: &str, phone: &str) -> String {
    format!("auth:lock:ip_phone:{}:{}", ip, phone)
}

/// Counter and marker for one IP
pub fn ip_keys(ip: &str) -> [String; 2] {
    [fail_ip(ip), lock_ip(ip)]
}

/// Counter and marker for one IP+phone pair
pub fn ip_phone_keys(ip: &str, phone: &str) -> [String; 2] {
    [fail_ip_phone(ip, phone), lock_ip_phone(ip, phone)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(fail_ip("1.2.3.4"), "auth:fail:ip:1.2.3.4");
        assert_eq!(lock_ip("1.2.3.4"), "auth:lock:ip:1.2.3.4");
        assert_eq!(
            fail_ip_phone("1.2.3.4", "13800000001"),
            "auth:fail:ip_phone:1.2.3.4:13800000001"
        );
        assert_eq!(
            lock_ip_phone("1.2.3.4", "13800000001"),
            "auth:lock:ip_phone:1.2.3.4:13800000001"
        );
    }
}
