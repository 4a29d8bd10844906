use bluefruit_packet::{
    AccelerometerPacket, ButtonPacket, ColorPacket, ControllerPacket, GyroPacket, LocationPacket,
    MagnetometerPacket, Packet, PacketError, PacketRegistry, QuaternionPacket, TypeHeader,
};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f32> {
    prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO
}

fn any_controller_packet() -> impl Strategy<Value = Packet> {
    prop_oneof![
        (finite(), finite(), finite())
            .prop_map(|(x, y, z)| Packet::from(AccelerometerPacket::new(x, y, z))),
        (finite(), finite(), finite()).prop_map(|(x, y, z)| Packet::from(GyroPacket::new(x, y, z))),
        (finite(), finite(), finite())
            .prop_map(|(x, y, z)| Packet::from(MagnetometerPacket::new(x, y, z))),
        (finite(), finite(), finite(), finite())
            .prop_map(|(x, y, z, w)| Packet::from(QuaternionPacket::new(x, y, z, w))),
        (finite(), finite(), finite())
            .prop_map(|(a, b, c)| Packet::from(LocationPacket::new(a, b, c))),
        any::<[u8; 3]>().prop_map(|rgb| Packet::from(ColorPacket::from(rgb))),
        (0x21u8..0x7f, any::<bool>()).prop_map(|(label, pressed)| {
            Packet::from(ButtonPacket::from_label(char::from(label), pressed).unwrap())
        }),
    ]
}

proptest! {
    #[test]
    fn encoded_packets_decode_to_themselves(packet in any_controller_packet()) {
        let registry = PacketRegistry::standard();
        let bytes = packet.to_bytes();
        prop_assert_eq!(registry.decode(&bytes).unwrap(), packet);
    }

    #[test]
    fn single_bit_flip_after_header_fails_checksum(
        packet in any_controller_packet(),
        offset in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let registry = PacketRegistry::standard();
        let mut bytes = packet.to_bytes().to_vec();
        let index = 2 + offset.index(bytes.len() - 2);
        bytes[index] ^= 1 << bit;

        let err = registry.decode(&bytes).unwrap_err();
        prop_assert!(matches!(err, PacketError::BadChecksum { .. }), "got {err:?}");
    }

    #[test]
    fn length_off_by_one_is_wrong_length(packet in any_controller_packet(), extra in any::<u8>()) {
        let registry = PacketRegistry::standard();
        let bytes = packet.to_bytes().to_vec();

        let mut longer = bytes.clone();
        longer.push(extra);
        let longer_is_wrong = matches!(
            registry.decode(&longer),
            Err(PacketError::WrongLength { actual, .. }) if actual == bytes.len() + 1
        );
        prop_assert!(longer_is_wrong);

        let shorter = &bytes[..bytes.len() - 1];
        let shorter_is_wrong = matches!(
            registry.decode(shorter),
            Err(PacketError::WrongLength { actual, .. }) if actual == bytes.len() - 1
        );
        prop_assert!(shorter_is_wrong);
    }

    #[test]
    fn unknown_selector_is_unregistered(
        selector in any::<u8>().prop_filter("registered selector", |b| !b"ABCGLMQ".contains(b)),
        body in prop::collection::vec(any::<u8>(), 1..24),
    ) {
        let registry = PacketRegistry::standard();
        let mut bytes = vec![b'!', selector];
        bytes.extend_from_slice(&body);

        let err = registry.decode(&bytes).unwrap_err();
        prop_assert!(
            matches!(err, PacketError::UnregisteredType(h) if h == TypeHeader::framed(selector))
        );
    }

    #[test]
    fn color_rgb_integer_roundtrip(rgb in 0u32..=0x00FF_FFFF) {
        let color = ColorPacket::from_rgb(rgb).unwrap();
        prop_assert_eq!(color.to_rgb(), rgb);
        prop_assert_eq!(ColorPacket::from_bytes(&color.to_bytes()).unwrap(), color);
    }
}
